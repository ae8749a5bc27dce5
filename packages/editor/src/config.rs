use serde::{Deserialize, Serialize};

/// Tunables for a document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum undo levels kept per document (0 = unlimited)
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { history_limit: 100 }
    }
}
