//! # Editor Session
//!
//! One open funnel with exactly one active step. The session owns the active
//! step's [`DocumentStore`], starts and collects saves, switches steps and
//! applies templates.
//!
//! ## Step lifecycle
//!
//! ```text
//! switch_step(next) ─→ dirty? ─ no ──────────────────────→ load next, fresh store
//!                         └─ yes → gate.confirm_discard ─ yes → discard, load next
//!                                                       └─ no  → UnsavedChanges
//! ```
//!
//! A fresh store always starts clean with empty history.

use crate::catalog::TemplateCatalog;
use crate::errors::{WorkspaceError, WorkspaceResult};
use crate::funnel::{Funnel, FunnelStep, StepId};
use crate::gateway::PersistenceGateway;
use crate::save::{SaveCoordinator, SaveOutcome};
use crate::template::TemplateApplier;
use funnel_editor::{Document, DocumentStore, EditorConfig};
use std::sync::Arc;

/// Asked before a dirty document is thrown away
pub trait DiscardGate {
    fn confirm_discard(&self, step: &FunnelStep) -> bool;
}

impl<F: Fn(&FunnelStep) -> bool> DiscardGate for F {
    fn confirm_discard(&self, step: &FunnelStep) -> bool {
        self(step)
    }
}

/// Gate that always allows discarding
pub struct AlwaysDiscard;

impl DiscardGate for AlwaysDiscard {
    fn confirm_discard(&self, _step: &FunnelStep) -> bool {
        true
    }
}

/// Gate that never allows discarding
pub struct NeverDiscard;

impl DiscardGate for NeverDiscard {
    fn confirm_discard(&self, _step: &FunnelStep) -> bool {
        false
    }
}

pub struct EditorSession {
    funnel: Funnel,
    active: StepId,
    store: DocumentStore,
    gateway: Arc<dyn PersistenceGateway>,
    saves: SaveCoordinator,
    config: EditorConfig,
}

impl EditorSession {
    /// Open `funnel_id` with its first step active
    pub async fn open(
        gateway: Arc<dyn PersistenceGateway>,
        funnel_id: &str,
        config: EditorConfig,
    ) -> WorkspaceResult<Self> {
        let mut funnel = gateway.load_funnel(funnel_id).await?;
        let active = funnel
            .first_step()
            .map(|step| step.id.clone())
            .ok_or_else(|| WorkspaceError::EmptyFunnel(funnel_id.to_string()))?;

        let store = load_store(gateway.as_ref(), &mut funnel, &active, &config).await?;
        tracing::info!("Opened funnel {} at step {}", funnel.id, active);

        Ok(Self {
            funnel,
            active,
            store,
            saves: SaveCoordinator::new(Arc::clone(&gateway)),
            gateway,
            config,
        })
    }

    pub fn funnel(&self) -> &Funnel {
        &self.funnel
    }

    pub fn active_step_id(&self) -> &StepId {
        &self.active
    }

    pub fn active_step(&self) -> Option<&FunnelStep> {
        self.funnel.step(&self.active)
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DocumentStore {
        &mut self.store
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.saves.is_pending()
    }

    /// Make `step_id` the active step. A dirty document is only dropped if
    /// `gate` agrees.
    pub async fn switch_step(&mut self, step_id: &StepId, gate: &dyn DiscardGate) -> WorkspaceResult<()> {
        if step_id == &self.active {
            return Ok(());
        }
        if self.funnel.step(step_id).is_none() {
            return Err(WorkspaceError::StepNotFound(step_id.clone()));
        }
        self.confirm_leave(gate)?;

        let store = load_store(self.gateway.as_ref(), &mut self.funnel, step_id, &self.config).await?;

        self.saves.detach();
        self.store.discard();
        self.store = store;
        self.active = step_id.clone();
        tracing::info!("Switched to step {}", step_id);
        Ok(())
    }

    /// Snapshot the active document and start saving it in the background
    pub fn begin_save(&mut self) -> u64 {
        let revision = self.store.revision();
        self.saves
            .begin(self.active.clone(), self.store.document().clone(), revision);
        revision
    }

    /// Wait for the pending save and fold its result into the session
    pub async fn finish_save(&mut self) -> WorkspaceResult<()> {
        match self.saves.finish().await {
            Some(outcome) => self.acknowledge_save(outcome),
            None => Ok(()),
        }
    }

    /// Save the active document and wait for the result
    pub async fn save(&mut self) -> WorkspaceResult<()> {
        self.begin_save();
        self.finish_save().await
    }

    /// Apply a finished save. Failure leaves the document dirty.
    pub fn acknowledge_save(&mut self, outcome: SaveOutcome) -> WorkspaceResult<()> {
        match outcome {
            SaveOutcome::Saved {
                step_id,
                revision,
                document,
            } => {
                if let Some(step) = self.funnel.step_mut(&step_id) {
                    step.content = document;
                }
                if step_id != self.active {
                    return Ok(());
                }

                if self.store.revision() == revision {
                    self.store.mark_saved();
                    tracing::info!("Saved step {} at revision {}", step_id, revision);
                } else {
                    tracing::debug!(
                        "Saved revision {} of step {}, but the store moved on to {}",
                        revision,
                        step_id,
                        self.store.revision()
                    );
                }
                Ok(())
            }
            SaveOutcome::Failed {
                step_id,
                revision,
                error,
            } => {
                tracing::error!("Saving step {} at revision {} failed: {}", step_id, revision, error);
                Err(error)
            }
        }
    }

    /// Replace every step with the steps of `template_id`.
    ///
    /// Nothing local changes unless storage confirms the replacement.
    pub async fn apply_template(
        &mut self,
        catalog: &dyn TemplateCatalog,
        template_id: &str,
        gate: &dyn DiscardGate,
    ) -> WorkspaceResult<()> {
        self.confirm_leave(gate)?;

        let steps = TemplateApplier::new(catalog, self.gateway.as_ref())
            .apply(&self.funnel.id, template_id)
            .await?;

        let first = steps
            .first()
            .cloned()
            .ok_or_else(|| WorkspaceError::EmptyTemplate(template_id.to_string()))?;

        self.saves.cancel();
        self.store.discard();
        self.store = DocumentStore::with_config(first.content, &self.config);
        self.active = first.id;
        self.funnel.steps = steps;
        Ok(())
    }

    fn confirm_leave(&self, gate: &dyn DiscardGate) -> WorkspaceResult<()> {
        if !self.store.is_dirty() {
            return Ok(());
        }
        match self.active_step() {
            Some(step) if gate.confirm_discard(step) => Ok(()),
            _ => Err(WorkspaceError::UnsavedChanges),
        }
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        if self.store.is_dirty() {
            tracing::warn!("Closing funnel {} with unsaved changes on step {}", self.funnel.id, self.active);
        }
    }
}

/// Load and normalize a step's stored content into a fresh store
async fn load_store(
    gateway: &dyn PersistenceGateway,
    funnel: &mut Funnel,
    step_id: &StepId,
    config: &EditorConfig,
) -> WorkspaceResult<DocumentStore> {
    let raw = gateway.load_step(step_id).await?;
    let loaded = Document::load(&raw);
    if !loaded.is_clean() {
        tracing::warn!("Step {} loaded with issues: {:?}", step_id, loaded.issues);
    }

    if let Some(step) = funnel.step_mut(step_id) {
        step.content = loaded.document.clone();
    }
    Ok(DocumentStore::from_loaded(loaded, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use funnel_blocks::BlockKind;

    async fn session_with_steps(count: usize) -> (EditorSession, Arc<MemoryGateway>) {
        let gateway = Arc::new(MemoryGateway::new());
        let mut funnel = Funnel::new("f1", "Launch");
        for i in 0..count {
            funnel.steps.push(FunnelStep::new(format!("Step {}", i), format!("step-{}", i)));
        }
        gateway.put_funnel(&funnel).await;

        let session = EditorSession::open(gateway.clone(), "f1", EditorConfig::default())
            .await
            .unwrap();
        (session, gateway)
    }

    #[tokio::test]
    async fn test_open_activates_first_step() {
        let (session, _) = session_with_steps(2).await;
        assert_eq!(session.active_step_id(), &session.funnel().steps[0].id);
        assert!(!session.has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_open_empty_funnel() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.put_funnel(&Funnel::new("empty", "Empty")).await;

        let result = EditorSession::open(gateway, "empty", EditorConfig::default()).await;
        assert!(matches!(result, Err(WorkspaceError::EmptyFunnel(_))));
    }

    #[tokio::test]
    async fn test_closure_gate() {
        let (mut session, _) = session_with_steps(2).await;
        let target = session.funnel().steps[1].id.clone();
        session.store_mut().insert_block(BlockKind::Text, None).unwrap();

        let asked = std::cell::Cell::new(false);
        let gate = |step: &FunnelStep| {
            asked.set(true);
            step.slug == "step-0"
        };

        session.switch_step(&target, &gate).await.unwrap();
        assert!(asked.get());
        assert_eq!(session.active_step_id(), &target);
    }

    #[tokio::test]
    async fn test_switch_to_unknown_step() {
        let (mut session, _) = session_with_steps(1).await;
        let err = session
            .switch_step(&StepId::from_raw("ghost"), &AlwaysDiscard)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::StepNotFound(_)));
    }

    #[tokio::test]
    async fn test_save_updates_funnel_content() {
        let (mut session, _) = session_with_steps(1).await;
        session.store_mut().insert_block(BlockKind::Image, None).unwrap();

        session.save().await.unwrap();

        assert!(!session.has_unsaved_changes());
        assert_eq!(session.active_step().unwrap().content, *session.store().document());
    }
}
