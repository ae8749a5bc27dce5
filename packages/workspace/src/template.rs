//! # Template Application
//!
//! Replaces every step of a funnel with the steps of a template, all or
//! nothing. Local state is only touched after storage confirms:
//!
//! ```text
//! resolve template → instantiate (fresh ids) → replace_all_steps ─┬─ Ok  → caller swaps steps in
//!                                                                 └─ Err → caller keeps everything
//! ```
//!
//! The applier itself never holds local state; it hands back the committed
//! steps and leaves the swap to [`crate::EditorSession::apply_template`].

use crate::catalog::TemplateCatalog;
use crate::errors::{WorkspaceError, WorkspaceResult};
use crate::funnel::FunnelStep;
use crate::gateway::PersistenceGateway;

pub struct TemplateApplier<'a> {
    catalog: &'a dyn TemplateCatalog,
    gateway: &'a dyn PersistenceGateway,
}

impl<'a> TemplateApplier<'a> {
    pub fn new(catalog: &'a dyn TemplateCatalog, gateway: &'a dyn PersistenceGateway) -> Self {
        Self { catalog, gateway }
    }

    /// Resolve and instantiate `template_id` without writing anything
    pub fn prepare(&self, template_id: &str) -> WorkspaceResult<Vec<FunnelStep>> {
        let template = self
            .catalog
            .get(template_id)
            .ok_or_else(|| WorkspaceError::TemplateNotFound(template_id.to_string()))?;

        template.instantiate()
    }

    /// Replace the steps of `funnel_id` remotely. Returns the committed steps.
    pub async fn apply(&self, funnel_id: &str, template_id: &str) -> WorkspaceResult<Vec<FunnelStep>> {
        let steps = self.prepare(template_id)?;

        match self.gateway.replace_all_steps(funnel_id, &steps).await {
            Ok(()) => {
                tracing::info!(
                    "Applied template {} to funnel {} ({} steps)",
                    template_id,
                    funnel_id,
                    steps.len()
                );
                Ok(steps)
            }
            Err(e) => {
                tracing::error!("Applying template {} to funnel {} failed: {}", template_id, funnel_id, e);
                Err(e)
            }
        }
    }
}
