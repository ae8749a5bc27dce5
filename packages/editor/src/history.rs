//! # Edit History
//!
//! Snapshot-based undo/redo for a single document.
//!
//! ## Design
//!
//! - Before every applied mutation the store records the whole document as
//!   it was immediately before
//! - Undo swaps the current document with the newest `past` snapshot and
//!   moves the current one onto `future`
//! - Redo is the exact inverse
//! - Recording a new snapshot clears `future`
//! - Batches fold several mutations into one undo step
//!
//! Snapshots are full copies. Documents hold a few dozen blocks, so the copy
//! is cheaper than maintaining an inverse for every mutation kind.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = EditHistory::new();
//! let mut doc = Document::empty();
//!
//! let before = doc.clone();
//! // ... mutate doc ...
//! history.record(before, "Insert block");
//!
//! history.undo(&mut doc);
//! history.redo(&mut doc);
//! ```

use crate::Document;

/// One undo step: the document before the step plus a UI label
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub snapshot: Document,
    pub label: &'static str,
}

/// Past/future snapshot stacks
#[derive(Debug, Clone)]
pub struct EditHistory {
    /// Applied steps, most recent last
    past: Vec<HistoryEntry>,

    /// Undone steps, next redo last
    future: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Open batch: only its first snapshot is kept
    batch: Option<BatchState>,
}

#[derive(Debug, Clone)]
struct BatchState {
    label: &'static str,
    recorded: bool,
}

impl EditHistory {
    /// History with the default limit of 100 levels
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_levels,
            batch: None,
        }
    }

    /// Record the state as it was immediately before a mutation
    pub fn record(&mut self, before: Document, label: &'static str) {
        let label = match &mut self.batch {
            Some(batch) if batch.recorded => None,
            Some(batch) => {
                batch.recorded = true;
                Some(batch.label)
            }
            None => Some(label),
        };

        if let Some(label) = label {
            self.push(HistoryEntry { snapshot: before, label });
        }
        self.future.clear();
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.past.push(entry);

        if self.max_levels > 0 && self.past.len() > self.max_levels {
            self.past.remove(0);
        }
    }

    /// Restore the newest past snapshot. Returns false if there is none.
    pub fn undo(&mut self, current: &mut Document) -> bool {
        self.end_batch();

        let Some(entry) = self.past.pop() else {
            return false;
        };

        let undone = std::mem::replace(current, entry.snapshot);
        self.future.push(HistoryEntry {
            snapshot: undone,
            label: entry.label,
        });
        true
    }

    /// Re-apply the most recently undone step. Returns false if there is none.
    pub fn redo(&mut self, current: &mut Document) -> bool {
        self.end_batch();

        let Some(entry) = self.future.pop() else {
            return false;
        };

        let redone = std::mem::replace(current, entry.snapshot);
        self.past.push(HistoryEntry {
            snapshot: redone,
            label: entry.label,
        });
        true
    }

    /// Fold every mutation until [`EditHistory::end_batch`] into one step
    pub fn begin_batch(&mut self, label: &'static str) {
        self.batch = Some(BatchState {
            label,
            recorded: false,
        });
    }

    pub fn end_batch(&mut self) {
        self.batch = None;
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    pub fn undo_description(&self) -> Option<&'static str> {
        self.past.last().map(|entry| entry.label)
    }

    pub fn redo_description(&self) -> Option<&'static str> {
        self.future.last().map(|entry| entry.label)
    }

    /// Drop both stacks
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.batch = None;
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}
