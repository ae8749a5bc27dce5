use crate::funnel::StepId;
use funnel_editor::EditorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template {0} defines no steps")]
    EmptyTemplate(String),

    #[error("Invalid template {id}: {message}")]
    InvalidTemplate { id: String, message: String },

    #[error("Active step has unsaved changes")]
    UnsavedChanges,

    #[error("Step not found: {0}")]
    StepNotFound(StepId),

    #[error("Funnel not found: {0}")]
    FunnelNotFound(String),

    #[error("Funnel {0} has no steps")]
    EmptyFunnel(String),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

impl WorkspaceError {
    pub(crate) fn persistence(context: impl std::fmt::Display, cause: impl std::fmt::Display) -> Self {
        WorkspaceError::PersistenceFailure(format!("{}: {}", context, cause))
    }
}
