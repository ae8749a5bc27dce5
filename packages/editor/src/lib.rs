//! # Funnel Editor
//!
//! In-memory document editing engine behind the visual funnel builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: catalog, payload schemas, ids       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: one active step's document          │
//! │  - Load + normalize stored content          │
//! │  - Mutations with validation rules          │
//! │  - Snapshot undo/redo                       │
//! │  - Id-stable reordering                     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: funnels, saving, templates       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One handle**: all reads and writes go through [`DocumentStore`]
//! 2. **Snapshot before change**: every applied mutation records one undo step
//! 3. **Typed payloads**: stored JSON is normalized, never trusted as-is
//! 4. **Quiet model failures**: missing blocks and vetoed changes come back as
//!    [`MutationOutcome`]s, not errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use funnel_editor::{Document, DocumentStore, EditorConfig};
//! use funnel_blocks::BlockKind;
//!
//! let loaded = Document::load(&raw_json);
//! let mut store = DocumentStore::from_loaded(loaded, &EditorConfig::default());
//!
//! let headline = store.insert_block(BlockKind::Headline, None)?;
//! let text = store.insert_block(BlockKind::Text, None)?;
//! store.move_block(&text, &headline);
//!
//! store.undo();
//! store.redo();
//! ```

mod config;
mod document;
mod errors;
mod history;
mod mutations;
mod notices;
mod reorder;
mod session;
mod store;
mod validation;

pub use config::EditorConfig;
pub use document::{Document, LoadIssue, LoadedDocument, PageSettingKey, PageSettings};
pub use errors::EditorError;
pub use history::{EditHistory, HistoryEntry};
pub use mutations::{ContentChange, Mutation, MutationOutcome, NoopReason};
pub use notices::{Notice, NoticeLevel};
pub use reorder::{array_move, DragGesture, MoveDirection};
pub use session::{DocumentStatus, SelectionState};
pub use store::DocumentStore;
pub use validation::{HeadlineLevelRange, PaymentMethodMinimum, Rejection, RuleSet, ValidationRule};

// Re-export the block model for convenience
pub use funnel_blocks::{Block, BlockContent, BlockId, BlockKind, BlockStyles};
