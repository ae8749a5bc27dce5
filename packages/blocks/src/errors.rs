//! Error types for the block model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlockError {
    #[error("Invalid block type: {0}")]
    InvalidBlockType(String),

    #[error("Malformed block: {0}")]
    MalformedBlock(String),
}
