//! # Document Mutations
//!
//! High-level operations a UI gesture can perform on the active document.
//!
//! ## Semantics
//!
//! ### InsertBlock
//! - Appends, or inserts right after `after_index` (clamped to the end)
//!
//! ### UpdateContent / UpdateStyle
//! - Shallow merge of `patch` into the payload
//! - Keys that do not fit the block's schema are dropped
//! - Unknown block id is a silent no-op (late events for deleted blocks)
//!
//! ### DeleteBlock
//! - Removes the block, clears the selection if it pointed at it
//!
//! ### MoveBlock
//! - Relocates `active_id` to the position of `over_id`
//! - No-op when either id is missing or both are the same
//!
//! Every applied mutation records one undo step; no-ops and rejections
//! record nothing.

use crate::validation::Rejection;
use crate::PageSettingKey;
use funnel_blocks::{BlockId, BlockKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Semantic mutations (serializable for replay and logging)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    InsertBlock {
        block_type: BlockKind,
        after_index: Option<usize>,
    },

    UpdateContent {
        block_id: BlockId,
        patch: Map<String, Value>,
    },

    UpdateStyle {
        block_id: BlockId,
        patch: Map<String, Value>,
    },

    DeleteBlock {
        block_id: BlockId,
    },

    MoveBlock {
        active_id: BlockId,
        over_id: BlockId,
    },

    SetPageSetting {
        key: PageSettingKey,
        value: String,
    },
}

/// Why a mutation changed nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoopReason {
    /// Referenced block is not in the document
    BlockNotFound(BlockId),
    /// Move onto itself
    SameTarget,
    /// The change would leave the document as it is
    Unchanged,
    /// The document was discarded and accepts no more edits
    Discarded,
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Mutation applied; `revision` is the store's new revision
    Applied { revision: u64 },
    /// Nothing to do; no history entry was recorded
    Noop { reason: NoopReason },
    /// A validation rule vetoed the change; state is unchanged
    Rejected { reason: Rejection },
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, MutationOutcome::Noop { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, MutationOutcome::Rejected { .. })
    }
}

/// Inline edit emitted by the renderer: one field of one block changed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentChange {
    pub block_id: BlockId,
    pub field: String,
    pub new_value: Value,
}

impl ContentChange {
    pub fn new(block_id: BlockId, field: impl Into<String>, new_value: impl Into<Value>) -> Self {
        Self {
            block_id,
            field: field.into(),
            new_value: new_value.into(),
        }
    }

    /// The equivalent one-key content patch
    pub fn to_patch(&self) -> Map<String, Value> {
        let mut patch = Map::new();
        patch.insert(self.field.clone(), self.new_value.clone());
        patch
    }
}
