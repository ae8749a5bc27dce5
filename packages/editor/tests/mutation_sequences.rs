//! Comprehensive tests for mutation sequences
//!
//! This tests:
//! - Undo/redo over arbitrary mutation chains
//! - Redo invalidation after new edits
//! - Reorder preserving the set of ids
//! - Checkout invariant over arbitrary toggles

use funnel_editor::{BlockId, BlockKind, Document, DocumentStore, Mutation, PageSettingKey};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, Option<usize>),
    Delete(usize),
    Move(usize, usize),
    Content(usize, String),
    Style(usize, String),
    Background(String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..BlockKind::ALL.len(), proptest::option::of(0..8usize)).prop_map(|(k, i)| Op::Insert(k, i)),
        (0..8usize).prop_map(Op::Delete),
        (0..8usize, 0..8usize).prop_map(|(a, b)| Op::Move(a, b)),
        (0..8usize, "[a-z]{1,6}").prop_map(|(i, s)| Op::Content(i, s)),
        (0..8usize, "[0-9]{1,2}px").prop_map(|(i, s)| Op::Style(i, s)),
        "#[0-9a-f]{6}".prop_map(Op::Background),
    ]
}

fn patch(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

/// Resolve index-based ops against the live document
fn to_mutation(store: &DocumentStore, op: &Op) -> Option<Mutation> {
    let id_at = |i: usize| -> Option<BlockId> { store.blocks().get(i).map(|b| b.id.clone()) };

    Some(match op {
        Op::Insert(kind, after) => Mutation::InsertBlock {
            block_type: BlockKind::ALL[*kind],
            after_index: *after,
        },
        Op::Delete(i) => Mutation::DeleteBlock { block_id: id_at(*i)? },
        Op::Move(a, b) => Mutation::MoveBlock {
            active_id: id_at(*a)?,
            over_id: id_at(*b)?,
        },
        Op::Content(i, text) => Mutation::UpdateContent {
            block_id: id_at(*i)?,
            patch: patch(json!({ "text": text })),
        },
        Op::Style(i, padding) => Mutation::UpdateStyle {
            block_id: id_at(*i)?,
            patch: patch(json!({ "padding": padding })),
        },
        Op::Background(color) => Mutation::SetPageSetting {
            key: PageSettingKey::BackgroundColor,
            value: color.clone(),
        },
    })
}

fn seeded_store() -> DocumentStore {
    let mut store = DocumentStore::new(Document::empty());
    store.insert_block(BlockKind::Headline, None).unwrap();
    store.insert_block(BlockKind::Text, None).unwrap();
    store.insert_block(BlockKind::Checkout, None).unwrap();
    store.mark_saved();
    store
}

proptest! {
    #[test]
    fn prop_undo_redo_inverse_law(ops in proptest::collection::vec(op_strategy(), 1..30)) {
        let mut store = seeded_store();
        let levels_before = store.history().undo_levels();
        let initial = store.document().clone();

        let mut applied = 0;
        for op in &ops {
            if let Some(mutation) = to_mutation(&store, op) {
                if store.apply(mutation).is_applied() {
                    applied += 1;
                }
            }
        }
        let final_state = store.document().clone();
        prop_assert_eq!(store.history().undo_levels(), levels_before + applied);

        for _ in 0..applied {
            prop_assert!(store.undo());
        }
        prop_assert_eq!(store.document(), &initial);

        for _ in 0..applied {
            prop_assert!(store.redo());
        }
        prop_assert_eq!(store.document(), &final_state);
        prop_assert!(!store.history().can_redo());
    }

    #[test]
    fn prop_move_preserves_ids(a in 0..6usize, b in 0..6usize) {
        let mut store = DocumentStore::default();
        for kind in &BlockKind::ALL[..6] {
            store.insert_block(*kind, None).unwrap();
        }
        let before: Vec<BlockId> = store.document().ids().cloned().collect();
        let active = before[a].clone();
        let over = before[b].clone();

        store.move_block(&active, &over);
        let after: Vec<BlockId> = store.document().ids().cloned().collect();

        prop_assert_eq!(
            before.iter().collect::<BTreeSet<_>>(),
            after.iter().collect::<BTreeSet<_>>()
        );
        prop_assert_eq!(&after[b], &active);

        let rest_before: Vec<_> = before.iter().filter(|id| **id != active).collect();
        let rest_after: Vec<_> = after.iter().filter(|id| **id != active).collect();
        prop_assert_eq!(rest_before, rest_after);
    }

    #[test]
    fn prop_checkout_never_loses_all_methods(toggles in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..20)) {
        let mut store = DocumentStore::default();
        let id = store.insert_block(BlockKind::Checkout, None).unwrap();

        for (card, bank) in toggles {
            let before = store.blocks()[0].content.as_checkout().unwrap().clone();
            let outcome = store.update_block_content(&id, &patch(json!({ "enableCard": card, "enableBank": bank })));

            let now = store.blocks()[0].content.as_checkout().unwrap();
            prop_assert!(now.enable_card || now.enable_bank);
            if !card && !bank {
                prop_assert!(outcome.is_rejected());
                prop_assert_eq!(now, &before);
            }
        }
    }
}

#[test]
fn test_mutation_after_undo_discards_future() {
    let mut store = DocumentStore::default();
    store.insert_block(BlockKind::Headline, None).unwrap();
    store.insert_block(BlockKind::Text, None).unwrap();
    store.insert_block(BlockKind::Image, None).unwrap();

    store.undo();
    store.undo();
    assert_eq!(store.history().redo_levels(), 2);

    store.insert_block(BlockKind::Button, None).unwrap();
    assert_eq!(store.history().redo_levels(), 0);
    assert!(!store.redo());

    let kinds: Vec<_> = store.blocks().iter().map(|b| b.kind()).collect();
    assert_eq!(kinds, vec![BlockKind::Headline, BlockKind::Button]);
}

#[test]
fn test_rejected_and_noop_mutations_leave_future_intact() {
    let mut store = DocumentStore::default();
    let pay = store.insert_block(BlockKind::Checkout, None).unwrap();
    store.insert_block(BlockKind::Text, None).unwrap();
    store.undo();
    assert_eq!(store.history().redo_levels(), 1);

    store.update_block_content(&pay, &patch(json!({ "enableCard": false })));
    store.move_block(&pay, &pay);
    store.delete_block(&BlockId::from_raw("missing"));

    assert_eq!(store.history().redo_levels(), 1);
    assert!(store.redo());
}

#[test]
fn test_undo_past_save_point() {
    let mut store = DocumentStore::default();
    store.insert_block(BlockKind::Headline, None).unwrap();
    store.mark_saved();
    let saved_revision = store.revision();

    store.insert_block(BlockKind::Text, None).unwrap();
    store.undo();
    store.undo();

    // History survives the save, so undo can go back beyond it
    assert!(store.blocks().is_empty());
    assert!(store.is_dirty());
    assert!(store.revision() > saved_revision);
}

#[test]
fn test_batched_edits_undo_together() {
    let mut store = DocumentStore::default();
    let id = store.insert_block(BlockKind::Text, None).unwrap();

    store.begin_batch("Typing");
    for text in ["H", "He", "Hel", "Hell", "Hello"] {
        store.update_block_content(&id, &patch(json!({ "text": text })));
    }
    store.end_batch();

    assert_eq!(store.history().undo_description(), Some("Typing"));
    store.undo();

    match &store.blocks()[0].content {
        funnel_editor::BlockContent::Text(t) => assert_eq!(t.text, "Tell your visitors why this matters."),
        other => panic!("Expected text, got {:?}", other),
    }
}
