//! # Document Store
//!
//! The single handle through which the active document is read and changed.
//!
//! Holds the document, its edit history, the selection, the save status and
//! the validation rules. Every mutating entry point follows the same path:
//!
//! ```text
//! guard (discarded?) → locate block → build next state → rules → commit
//!                                                                   ↓
//!                                            history.record(before), dirty
//! ```
//!
//! Nothing outside this module writes document fields directly.

use crate::history::EditHistory;
use crate::mutations::{ContentChange, Mutation, MutationOutcome, NoopReason};
use crate::notices::Notice;
use crate::session::{DocumentStatus, SelectionState};
use crate::validation::RuleSet;
use crate::{Document, EditorConfig, EditorError, LoadedDocument, PageSettingKey, PageSettings};
use funnel_blocks::{Block, BlockContent, BlockId, BlockKind, BlockStyles, Normalized};
use serde_json::{Map, Value};

/// Editable state of one funnel step
#[derive(Debug)]
pub struct DocumentStore {
    pub(crate) document: Document,
    history: EditHistory,
    selection: SelectionState,
    rules: RuleSet,
    status: DocumentStatus,
    /// Increments on every applied change, undo and redo included
    revision: u64,
    notices: Vec<Notice>,
}

impl DocumentStore {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, &EditorConfig::default())
    }

    pub fn with_config(document: Document, config: &EditorConfig) -> Self {
        Self {
            document,
            history: EditHistory::with_max_levels(config.history_limit),
            selection: SelectionState::Idle,
            rules: RuleSet::default(),
            status: DocumentStatus::Clean,
            revision: 0,
            notices: Vec::new(),
        }
    }

    /// Store for freshly loaded content; repairs are announced once
    pub fn from_loaded(loaded: LoadedDocument, config: &EditorConfig) -> Self {
        let mut store = Self::with_config(loaded.document, config);
        if !loaded.issues.is_empty() {
            tracing::info!("Loaded document with {} repaired issue(s)", loaded.issues.len());
            store
                .notices
                .push(Notice::info("Some content on this page was repaired while loading."));
        }
        store
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn blocks(&self) -> &[Block] {
        self.document.blocks()
    }

    pub fn page_settings(&self) -> &PageSettings {
        self.document.page_settings()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_block_id(&self) -> Option<&BlockId> {
        self.selection.selected_block_id()
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn is_dirty(&self) -> bool {
        self.status.is_dirty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drain pending user-facing notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    // -- mutations ------------------------------------------------------

    /// Insert a new block of `kind`; appends, or goes right after `after_index`
    pub fn insert_block(&mut self, kind: BlockKind, after_index: Option<usize>) -> Result<BlockId, EditorError> {
        if self.status == DocumentStatus::Discarded {
            return Err(EditorError::Discarded);
        }

        let block = Block::instantiate(kind);
        let id = block.id.clone();

        let mut next = self.document.clone();
        let position = match after_index {
            Some(index) => index.saturating_add(1).min(next.blocks.len()),
            None => next.blocks.len(),
        };
        next.blocks.insert(position, block);

        self.commit("Insert block", next);
        Ok(id)
    }

    /// Same as [`DocumentStore::insert_block`], from a catalog tag
    pub fn insert_block_named(&mut self, tag: &str, after_index: Option<usize>) -> Result<BlockId, EditorError> {
        let kind: BlockKind = tag.parse()?;
        self.insert_block(kind, after_index)
    }

    /// Shallow-merge `patch` into the block's content
    pub fn update_block_content(&mut self, id: &BlockId, patch: &Map<String, Value>) -> MutationOutcome {
        self.update_block(id, "Edit content", |block| {
            let merged: Normalized<BlockContent> = block.content.merge(patch);
            let mut after = block.clone();
            after.content = merged.value;
            (after, merged.dropped)
        })
    }

    /// Shallow-merge `patch` into the block's styles
    pub fn update_block_style(&mut self, id: &BlockId, patch: &Map<String, Value>) -> MutationOutcome {
        self.update_block(id, "Edit style", |block| {
            let merged: Normalized<BlockStyles> = block.styles.merge(patch);
            let mut after = block.clone();
            after.styles = merged.value;
            (after, merged.dropped)
        })
    }

    /// Feed an inline edit from the renderer back into the document
    pub fn ingest(&mut self, change: &ContentChange) -> MutationOutcome {
        self.update_block_content(&change.block_id, &change.to_patch())
    }

    pub fn delete_block(&mut self, id: &BlockId) -> MutationOutcome {
        if let Some(noop) = self.guard() {
            return noop;
        }
        let Some(index) = self.document.index_of(id) else {
            return Self::not_found(id);
        };

        let mut next = self.document.clone();
        next.blocks.remove(index);

        let outcome = self.commit("Delete block", next);
        if outcome.is_applied() && self.selection.selected_block_id() == Some(id) {
            self.selection.deselect();
        }
        outcome
    }

    pub fn set_page_setting(&mut self, key: PageSettingKey, value: impl Into<String>) -> MutationOutcome {
        if let Some(noop) = self.guard() {
            return noop;
        }

        let mut next = self.document.clone();
        next.page_settings.set(key, value.into());
        self.commit("Page settings", next)
    }

    /// Same as [`DocumentStore::set_page_setting`], from a setting name
    pub fn set_page_setting_named(&mut self, key: &str, value: impl Into<String>) -> Result<MutationOutcome, EditorError> {
        let key: PageSettingKey = key.parse()?;
        Ok(self.set_page_setting(key, value))
    }

    /// Apply a serialized mutation
    pub fn apply(&mut self, mutation: Mutation) -> MutationOutcome {
        match mutation {
            Mutation::InsertBlock {
                block_type,
                after_index,
            } => match self.insert_block(block_type, after_index) {
                Ok(_) => MutationOutcome::Applied {
                    revision: self.revision,
                },
                Err(_) => MutationOutcome::Noop {
                    reason: NoopReason::Discarded,
                },
            },
            Mutation::UpdateContent { block_id, patch } => self.update_block_content(&block_id, &patch),
            Mutation::UpdateStyle { block_id, patch } => self.update_block_style(&block_id, &patch),
            Mutation::DeleteBlock { block_id } => self.delete_block(&block_id),
            Mutation::MoveBlock { active_id, over_id } => self.move_block(&active_id, &over_id),
            Mutation::SetPageSetting { key, value } => self.set_page_setting(key, value),
        }
    }

    // -- history ----------------------------------------------------------

    /// Step back one mutation. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.status == DocumentStatus::Discarded || !self.history.undo(&mut self.document) {
            return false;
        }
        self.after_history_step();
        true
    }

    /// Re-apply the last undone mutation. Returns false if there was none.
    pub fn redo(&mut self) -> bool {
        if self.status == DocumentStatus::Discarded || !self.history.redo(&mut self.document) {
            return false;
        }
        self.after_history_step();
        true
    }

    /// Fold the following mutations into a single undo step
    pub fn begin_batch(&mut self, label: &'static str) {
        self.history.begin_batch(label);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    fn after_history_step(&mut self) {
        self.touch();
        let document = &self.document;
        self.selection.forget_missing(|id| document.index_of(id).is_some());
    }

    // -- lifecycle --------------------------------------------------------

    /// Record a successful save. History is kept.
    pub fn mark_saved(&mut self) {
        if self.status == DocumentStatus::Dirty {
            self.status = DocumentStatus::Clean;
        }
    }

    /// Throw the in-memory state away; the store accepts no further edits
    pub fn discard(&mut self) {
        if self.status == DocumentStatus::Dirty {
            tracing::warn!("Discarding document with unsaved changes");
        }
        self.status = DocumentStatus::Discarded;
        self.selection.deselect();
        self.history.clear();
    }

    // -- selection --------------------------------------------------------

    /// Select a block. Returns false if it does not exist.
    pub fn select(&mut self, id: &BlockId) -> bool {
        if self.document.index_of(id).is_none() {
            return false;
        }
        self.selection.select(id.clone());
        true
    }

    pub fn deselect(&mut self) {
        self.selection.deselect();
    }

    /// Start editing `field` of the selected block
    pub fn focus_field(&mut self, field: impl Into<String>) -> bool {
        self.selection.focus(field)
    }

    pub fn blur(&mut self) {
        self.selection.blur();
    }

    // -- internals --------------------------------------------------------

    pub(crate) fn guard(&self) -> Option<MutationOutcome> {
        (self.status == DocumentStatus::Discarded).then_some(MutationOutcome::Noop {
            reason: NoopReason::Discarded,
        })
    }

    pub(crate) fn not_found(id: &BlockId) -> MutationOutcome {
        tracing::debug!("Ignoring mutation for missing block {}", id);
        MutationOutcome::Noop {
            reason: NoopReason::BlockNotFound(id.clone()),
        }
    }

    fn update_block(
        &mut self,
        id: &BlockId,
        label: &'static str,
        build: impl FnOnce(&Block) -> (Block, Vec<String>),
    ) -> MutationOutcome {
        if let Some(noop) = self.guard() {
            return noop;
        }
        let Some(index) = self.document.index_of(id) else {
            return Self::not_found(id);
        };

        let before = &self.document.blocks[index];
        let (after, dropped) = build(before);
        if !dropped.is_empty() {
            tracing::warn!("Ignoring non-conforming keys {:?} for {} block {}", dropped, before.kind(), id);
            self.notices.push(Notice::warning(
                format!("Ignored invalid value for {}.", dropped.join(", ")),
                Some(id.clone()),
            ));
        }

        if &after == before {
            return MutationOutcome::Noop {
                reason: NoopReason::Unchanged,
            };
        }

        if let Err(rejection) = self.rules.check(before, &after) {
            tracing::warn!("Rejected change to block {}: {}", id, rejection);
            self.notices
                .push(Notice::warning(rejection.message.clone(), Some(id.clone())));
            return MutationOutcome::Rejected { reason: rejection };
        }

        let mut next = self.document.clone();
        next.blocks[index] = after;
        self.commit(label, next)
    }

    /// Swap in `next`, recording the current state for undo
    pub(crate) fn commit(&mut self, label: &'static str, next: Document) -> MutationOutcome {
        if next == self.document {
            return MutationOutcome::Noop {
                reason: NoopReason::Unchanged,
            };
        }

        let before = std::mem::replace(&mut self.document, next);
        self.history.record(before, label);
        self.touch();

        tracing::debug!("{} (revision {})", label, self.revision);
        MutationOutcome::Applied {
            revision: self.revision,
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.status = DocumentStatus::Dirty;
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(Document::empty())
    }
}
