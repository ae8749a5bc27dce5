//! User-facing notices raised by the store

use funnel_blocks::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Transient message for the host to display, e.g. as a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub block_id: Option<BlockId>,
}

impl Notice {
    pub fn warning(message: impl Into<String>, block_id: Option<BlockId>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            block_id,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            block_id: None,
        }
    }
}
