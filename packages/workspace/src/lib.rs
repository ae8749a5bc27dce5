//! # Funnel Workspace
//!
//! Everything around the in-memory editor that deals with whole funnels:
//! storage, templates, background saves and moving between steps.

pub mod catalog;
pub mod errors;
pub mod file_gateway;
pub mod funnel;
pub mod gateway;
pub mod save;
pub mod session;
pub mod template;

pub use catalog::{StaticCatalog, StepDefinition, TemplateCatalog, TemplateDefinition};
pub use errors::{WorkspaceError, WorkspaceResult};
pub use file_gateway::JsonFileGateway;
pub use funnel::{Funnel, FunnelManifest, FunnelStep, SeoMetadata, StepId, StepManifest};
pub use gateway::{MemoryGateway, PersistenceGateway};
pub use save::{SaveCoordinator, SaveOutcome};
pub use session::{AlwaysDiscard, DiscardGate, EditorSession, NeverDiscard};
pub use template::TemplateApplier;
