//! # Editing Session State
//!
//! Two small state machines tracked by the document store.
//!
//! Per block, driven by selection and focus events:
//!
//! ```text
//! Idle → Selected(id) → Editing(id, field) → Idle
//! ```
//!
//! Per document, driven by mutations, saves and navigation:
//!
//! ```text
//! Clean → Dirty → Clean        (markSaved)
//!           ↓
//!       Discarded              (step switch / confirmed navigation away)
//! ```

use funnel_blocks::BlockId;

/// Selection and focus within the canvas
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(BlockId),
    Editing { block_id: BlockId, field: String },
}

impl SelectionState {
    pub fn selected_block_id(&self) -> Option<&BlockId> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected(id) => Some(id),
            SelectionState::Editing { block_id, .. } => Some(block_id),
        }
    }

    pub fn editing_field(&self) -> Option<&str> {
        match self {
            SelectionState::Editing { field, .. } => Some(field),
            _ => None,
        }
    }

    pub(crate) fn select(&mut self, id: BlockId) {
        *self = SelectionState::Selected(id);
    }

    pub(crate) fn deselect(&mut self) {
        *self = SelectionState::Idle;
    }

    /// Focus a field of the selected block. Ignored when nothing is selected.
    pub(crate) fn focus(&mut self, field: impl Into<String>) -> bool {
        let Some(block_id) = self.selected_block_id().cloned() else {
            return false;
        };

        *self = SelectionState::Editing {
            block_id,
            field: field.into(),
        };
        true
    }

    /// Blur ends editing and returns to idle
    pub(crate) fn blur(&mut self) {
        if matches!(self, SelectionState::Editing { .. }) {
            *self = SelectionState::Idle;
        }
    }

    /// Drop the selection if it points at a block that no longer exists
    pub(crate) fn forget_missing(&mut self, exists: impl Fn(&BlockId) -> bool) {
        if let Some(id) = self.selected_block_id() {
            if !exists(id) {
                *self = SelectionState::Idle;
            }
        }
    }
}

/// Save state of the active document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentStatus {
    #[default]
    Clean,
    Dirty,
    Discarded,
}

impl DocumentStatus {
    pub fn is_dirty(self) -> bool {
        self == DocumentStatus::Dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_lifecycle() {
        let id = BlockId::from_raw("b1");
        let mut state = SelectionState::default();
        assert_eq!(state.selected_block_id(), None);

        state.select(id.clone());
        assert_eq!(state.selected_block_id(), Some(&id));

        assert!(state.focus("text"));
        assert_eq!(state.editing_field(), Some("text"));
        assert_eq!(state.selected_block_id(), Some(&id));

        state.blur();
        assert_eq!(state, SelectionState::Idle);
    }

    #[test]
    fn test_focus_without_selection_is_ignored() {
        let mut state = SelectionState::Idle;
        assert!(!state.focus("text"));
        assert_eq!(state, SelectionState::Idle);
    }

    #[test]
    fn test_blur_keeps_plain_selection() {
        let id = BlockId::from_raw("b1");
        let mut state = SelectionState::Selected(id.clone());
        state.blur();
        assert_eq!(state, SelectionState::Selected(id));
    }

    #[test]
    fn test_forget_missing_block() {
        let mut state = SelectionState::Editing {
            block_id: BlockId::from_raw("gone"),
            field: "label".to_string(),
        };
        state.forget_missing(|_| false);
        assert_eq!(state, SelectionState::Idle);
    }
}
