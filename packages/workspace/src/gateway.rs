//! # Persistence Gateway
//!
//! The remote boundary of the editor. The engine only ever talks to storage
//! through [`PersistenceGateway`]:
//!
//! - `save` writes one step's document; idempotent and safe to retry
//! - `load_step` returns stored content in whatever historical shape it has
//! - `replace_all_steps` swaps a funnel's whole step list in one atomic write
//! - `load_funnel` returns the funnel with every step's content normalized
//!
//! [`MemoryGateway`] keeps everything in memory and can be told to fail or to
//! slow down, which is what the session and template tests drive.

use crate::errors::{WorkspaceError, WorkspaceResult};
use crate::funnel::{Funnel, FunnelManifest, FunnelStep, StepId};
use async_trait::async_trait;
use funnel_editor::Document;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn save(&self, step_id: &StepId, document: &Document) -> WorkspaceResult<()>;

    /// Raw stored content; `Value::Null` when the step has none yet
    async fn load_step(&self, step_id: &StepId) -> WorkspaceResult<Value>;

    async fn replace_all_steps(&self, funnel_id: &str, steps: &[FunnelStep]) -> WorkspaceResult<()>;

    async fn load_funnel(&self, funnel_id: &str) -> WorkspaceResult<Funnel>;
}

#[derive(Default)]
struct MemoryState {
    steps: HashMap<StepId, Value>,
    funnels: HashMap<String, FunnelManifest>,
}

/// In-memory gateway with failure injection
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    fail_saves: AtomicBool,
    fail_replace: AtomicBool,
    save_delay_ms: AtomicU64,
    completed_saves: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw content for a step, in any shape
    pub async fn put_step_raw(&self, step_id: &StepId, raw: Value) {
        self.state.lock().await.steps.insert(step_id.clone(), raw);
    }

    /// Seed a funnel, contents included
    pub async fn put_funnel(&self, funnel: &Funnel) {
        let mut state = self.state.lock().await;
        for step in &funnel.steps {
            state.steps.insert(step.id.clone(), step.content.to_value());
        }
        state.funnels.insert(funnel.id.clone(), funnel.manifest());
    }

    pub async fn stored_step(&self, step_id: &StepId) -> Option<Value> {
        self.state.lock().await.steps.get(step_id).cloned()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_replace(&self, fail: bool) {
        self.fail_replace.store(fail, Ordering::SeqCst);
    }

    /// Make every save wait before writing
    pub fn set_save_delay(&self, delay: Duration) {
        self.save_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of saves that reached storage
    pub fn completed_saves(&self) -> usize {
        self.completed_saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn save(&self, step_id: &StepId, document: &Document) -> WorkspaceResult<()> {
        let delay = self.save_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(WorkspaceError::persistence(format!("save {}", step_id), "injected failure"));
        }

        self.state.lock().await.steps.insert(step_id.clone(), document.to_value());
        self.completed_saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_step(&self, step_id: &StepId) -> WorkspaceResult<Value> {
        Ok(self
            .state
            .lock()
            .await
            .steps
            .get(step_id)
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn replace_all_steps(&self, funnel_id: &str, steps: &[FunnelStep]) -> WorkspaceResult<()> {
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(WorkspaceError::persistence(format!("replace steps of {}", funnel_id), "injected failure"));
        }

        let mut state = self.state.lock().await;
        let name = state
            .funnels
            .get(funnel_id)
            .map(|manifest| manifest.name.clone())
            .unwrap_or_else(|| funnel_id.to_string());

        if let Some(old) = state.funnels.remove(funnel_id) {
            for step in old.steps {
                state.steps.remove(&step.id);
            }
        }
        for step in steps {
            state.steps.insert(step.id.clone(), step.content.to_value());
        }

        let mut funnel = Funnel::new(funnel_id, name);
        funnel.steps = steps.to_vec();
        state.funnels.insert(funnel_id.to_string(), funnel.manifest());
        Ok(())
    }

    async fn load_funnel(&self, funnel_id: &str) -> WorkspaceResult<Funnel> {
        let state = self.state.lock().await;
        let manifest = state
            .funnels
            .get(funnel_id)
            .cloned()
            .ok_or_else(|| WorkspaceError::FunnelNotFound(funnel_id.to_string()))?;

        let steps = manifest
            .steps
            .into_iter()
            .map(|step| {
                let raw = state.steps.get(&step.id).cloned().unwrap_or(Value::Null);
                step.with_content(Document::load(&raw).document)
            })
            .collect();

        Ok(Funnel {
            id: manifest.id,
            name: manifest.name,
            steps,
        })
    }
}
