//! Error types for the editor

use funnel_blocks::BlockError;
use thiserror::Error;

/// Caller-side failures. Model-level outcomes (not found, rejected by a
/// rule, nothing to do) are reported through `MutationOutcome` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Invalid block type: {0}")]
    InvalidBlockType(String),

    #[error("Malformed block: {0}")]
    MalformedBlock(String),

    #[error("Unknown page setting: {0}")]
    UnknownPageSetting(String),

    #[error("Document has been discarded")]
    Discarded,
}

impl From<BlockError> for EditorError {
    fn from(e: BlockError) -> Self {
        match e {
            BlockError::InvalidBlockType(tag) => EditorError::InvalidBlockType(tag),
            BlockError::MalformedBlock(reason) => EditorError::MalformedBlock(reason),
        }
    }
}
