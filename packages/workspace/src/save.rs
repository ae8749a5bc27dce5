//! # Save Coordination
//!
//! Saves run as tokio tasks so editing can continue while one is in flight.
//! Only the newest save matters. A superseded save that has not started
//! writing skips its write; one that already started runs to completion, and
//! the newer save waits for it, so an older snapshot never lands after a newer
//! one. Tasks are never aborted mid-write, which would strand temp files.
//!
//! Each save carries the store revision it snapshotted. The session marks the
//! store clean only if that revision is still current when the save lands.

use crate::errors::{WorkspaceError, WorkspaceResult};
use crate::funnel::StepId;
use crate::gateway::PersistenceGateway;
use funnel_editor::Document;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// How a save ended
#[derive(Debug)]
pub enum SaveOutcome {
    Saved {
        step_id: StepId,
        revision: u64,
        document: Document,
    },
    Failed {
        step_id: StepId,
        revision: u64,
        error: WorkspaceError,
    },
}

impl SaveOutcome {
    pub fn revision(&self) -> u64 {
        match self {
            SaveOutcome::Saved { revision, .. } | SaveOutcome::Failed { revision, .. } => *revision,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

struct InFlight {
    step_id: StepId,
    revision: u64,
    handle: JoinHandle<WorkspaceResult<Document>>,
    /// Set once a newer save or a cancel makes this one pointless
    superseded: Arc<AtomicBool>,
}

pub struct SaveCoordinator {
    gateway: Arc<dyn PersistenceGateway>,
    in_flight: Option<InFlight>,
}

impl SaveCoordinator {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            gateway,
            in_flight: None,
        }
    }

    /// Start saving `document` as of `revision`, superseding any older save
    pub fn begin(&mut self, step_id: StepId, document: Document, revision: u64) {
        let previous = self.in_flight.take().map(|previous| {
            previous.superseded.store(true, Ordering::SeqCst);
            if !previous.handle.is_finished() {
                tracing::debug!(
                    "Save of {} at revision {} superseded by revision {}",
                    previous.step_id,
                    previous.revision,
                    revision
                );
            }
            previous.handle
        });

        let gateway = Arc::clone(&self.gateway);
        let superseded = Arc::new(AtomicBool::new(false));
        let task_superseded = Arc::clone(&superseded);
        let task_step = step_id.clone();
        let handle = tokio::spawn(async move {
            // The older write must land first
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            if !task_superseded.load(Ordering::SeqCst) {
                gateway.save(&task_step, &document).await?;
            } else {
                tracing::debug!("Skipped superseded save of {} at revision {}", task_step, revision);
            }
            Ok(document)
        });

        self.in_flight = Some(InFlight {
            step_id,
            revision,
            handle,
            superseded,
        });
    }

    /// True while a save has been started and not yet collected
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Revision of the pending save, if any
    pub fn pending_revision(&self) -> Option<u64> {
        self.in_flight.as_ref().map(|f| f.revision)
    }

    /// Wait for the pending save. `None` if nothing was pending.
    pub async fn finish(&mut self) -> Option<SaveOutcome> {
        let InFlight {
            step_id,
            revision,
            handle,
            ..
        } = self.in_flight.take()?;

        let outcome = match handle.await {
            Ok(Ok(document)) => SaveOutcome::Saved {
                step_id,
                revision,
                document,
            },
            Ok(Err(error)) => SaveOutcome::Failed {
                step_id,
                revision,
                error,
            },
            Err(e) => SaveOutcome::Failed {
                step_id,
                revision,
                error: WorkspaceError::persistence("save task", e),
            },
        };
        Some(outcome)
    }

    /// Stop tracking the pending save. It keeps running to completion.
    pub fn detach(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!("Detached save of {} at revision {}", in_flight.step_id, in_flight.revision);
        }
    }

    /// Drop the pending save. It skips its write unless the write already started.
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.superseded.store(true, Ordering::SeqCst);
            tracing::debug!("Cancelled save of {} at revision {}", in_flight.step_id, in_flight.revision);
        }
    }
}
