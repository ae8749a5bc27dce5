//! # Reordering
//!
//! Moves blocks by identity rather than by index, so a gesture that started
//! before some other change still lands on the block it was aimed at.
//!
//! Pointer drags and keyboard moves both end in [`DocumentStore::move_block`]:
//!
//! ```text
//! DragGesture::start(a) → hover(b) → drop ─┐
//!                                          ├→ move_block(a, b)
//! move_by_key(a, Up | Down | First | Last) ┘
//! ```

use crate::mutations::{MutationOutcome, NoopReason};
use crate::DocumentStore;
use funnel_blocks::BlockId;

/// Keyboard move targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    First,
    Last,
}

/// Move the item at `from` to `to`, shifting everything in between.
/// Relative order of all other items is preserved.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

impl DocumentStore {
    /// Move `active_id` into the position currently held by `over_id`
    pub fn move_block(&mut self, active_id: &BlockId, over_id: &BlockId) -> MutationOutcome {
        if let Some(noop) = self.guard() {
            return noop;
        }
        if active_id == over_id {
            return MutationOutcome::Noop {
                reason: NoopReason::SameTarget,
            };
        }

        let Some(old_index) = self.document.index_of(active_id) else {
            return Self::not_found(active_id);
        };
        let Some(new_index) = self.document.index_of(over_id) else {
            return Self::not_found(over_id);
        };

        let mut next = self.document.clone();
        array_move(&mut next.blocks, old_index, new_index);
        self.commit("Move block", next)
    }

    /// Keyboard-driven move; resolves the neighbour and calls `move_block`
    pub fn move_by_key(&mut self, id: &BlockId, direction: MoveDirection) -> MutationOutcome {
        let Some(index) = self.document.index_of(id) else {
            return Self::not_found(id);
        };

        let last = self.document.len() - 1;
        let target = match direction {
            MoveDirection::Up => index.saturating_sub(1),
            MoveDirection::Down => (index + 1).min(last),
            MoveDirection::First => 0,
            MoveDirection::Last => last,
        };

        let over_id = self.document.blocks[target].id.clone();
        self.move_block(id, &over_id)
    }
}

/// In-progress pointer drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    active_id: BlockId,
    over_id: Option<BlockId>,
}

impl DragGesture {
    pub fn start(active_id: BlockId) -> Self {
        Self {
            active_id,
            over_id: None,
        }
    }

    pub fn active_id(&self) -> &BlockId {
        &self.active_id
    }

    pub fn over_id(&self) -> Option<&BlockId> {
        self.over_id.as_ref()
    }

    /// Pointer entered a drop target; `None` when it left all targets
    pub fn hover(&mut self, over_id: Option<BlockId>) {
        self.over_id = over_id;
    }

    /// Release over the current target
    pub fn drop_on(self, store: &mut DocumentStore) -> MutationOutcome {
        match &self.over_id {
            Some(over_id) => store.move_block(&self.active_id, over_id),
            None => MutationOutcome::Noop {
                reason: NoopReason::SameTarget,
            },
        }
    }

    /// Abandon the drag (escape key, pointer left the canvas)
    pub fn cancel(self) {
        tracing::trace!("Drag of {} cancelled", self.active_id);
    }
}
