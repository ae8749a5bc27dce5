//! Integration tests for whole-funnel editing
//! Tests gateway → session → store flow

use funnel_blocks::BlockKind;
use funnel_editor::{DocumentStatus, EditorConfig};
use funnel_workspace::{
    AlwaysDiscard, EditorSession, Funnel, FunnelStep, MemoryGateway, NeverDiscard, PersistenceGateway, StaticCatalog,
    WorkspaceError,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

async fn open_funnel(steps: &[&str]) -> (EditorSession, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new());
    let mut funnel = Funnel::new("f1", "Summer launch");
    for slug in steps {
        funnel.steps.push(FunnelStep::new(*slug, *slug));
    }
    gateway.put_funnel(&funnel).await;

    let session = EditorSession::open(gateway.clone(), "f1", EditorConfig::default())
        .await
        .expect("Failed to open funnel");
    (session, gateway)
}

#[tokio::test]
async fn test_template_apply_failure_leaves_state_untouched() {
    let (mut session, gateway) = open_funnel(&["landing", "thanks"]).await;
    let catalog = StaticCatalog::builtin().unwrap();

    let id = session.store_mut().insert_block(BlockKind::Checkout, None).unwrap();
    session.store_mut().select(&id);
    let funnel_before = session.funnel().clone();
    let document_before = session.store().document().clone();
    let active_before = session.active_step_id().clone();
    let revision_before = session.store().revision();

    gateway.fail_replace(true);
    let result = session.apply_template(&catalog, "sales-page", &AlwaysDiscard).await;

    assert!(matches!(result, Err(WorkspaceError::PersistenceFailure(_))));
    assert_eq!(session.funnel(), &funnel_before);
    assert_eq!(session.store().document(), &document_before);
    assert_eq!(session.active_step_id(), &active_before);
    assert_eq!(session.store().revision(), revision_before);
    assert_eq!(session.store().selected_block_id(), Some(&id));
    assert!(session.store().history().can_undo());
    assert!(session.has_unsaved_changes());

    // Retry succeeds once storage recovers
    gateway.fail_replace(false);
    session
        .apply_template(&catalog, "sales-page", &AlwaysDiscard)
        .await
        .unwrap();
    assert_eq!(session.funnel().steps.len(), 3);
}

#[tokio::test]
async fn test_template_apply_success_resets_editor() {
    let (mut session, gateway) = open_funnel(&["landing"]).await;
    let catalog = StaticCatalog::builtin().unwrap();
    session.store_mut().insert_block(BlockKind::Text, None).unwrap();
    session.save().await.unwrap();

    session
        .apply_template(&catalog, "lead-magnet", &NeverDiscard)
        .await
        .unwrap();

    let funnel = session.funnel();
    assert_eq!(funnel.steps.len(), 2);
    assert_eq!(session.active_step_id(), &funnel.steps[0].id);
    assert_eq!(session.store().status(), DocumentStatus::Clean);
    assert!(!session.store().history().can_undo());
    assert!(!session.store().history().can_redo());
    assert_eq!(session.store().blocks()[0].kind(), BlockKind::Headline);

    // No placeholder id survives
    for step in &funnel.steps {
        assert!(step.content.ids().all(|id| !id.as_str().starts_with("tpl-")));
    }

    let stored = gateway.load_funnel("f1").await.unwrap();
    assert_eq!(&stored.steps, &funnel.steps);
}

#[tokio::test]
async fn test_template_apply_respects_gate() {
    let (mut session, _) = open_funnel(&["landing"]).await;
    let catalog = StaticCatalog::builtin().unwrap();
    session.store_mut().insert_block(BlockKind::Text, None).unwrap();

    let result = session.apply_template(&catalog, "webinar", &NeverDiscard).await;
    assert!(matches!(result, Err(WorkspaceError::UnsavedChanges)));
    assert_eq!(session.funnel().steps.len(), 1);
}

#[tokio::test]
async fn test_step_switch_requires_confirmation_when_dirty() {
    let (mut session, _) = open_funnel(&["landing", "thanks"]).await;
    let landing = session.funnel().steps[0].id.clone();
    let thanks = session.funnel().steps[1].id.clone();

    session.store_mut().insert_block(BlockKind::Headline, None).unwrap();

    let refused = session.switch_step(&thanks, &NeverDiscard).await;
    assert!(matches!(refused, Err(WorkspaceError::UnsavedChanges)));
    assert_eq!(session.active_step_id(), &landing);
    assert_eq!(session.store().blocks().len(), 1);

    session.switch_step(&thanks, &AlwaysDiscard).await.unwrap();
    assert_eq!(session.active_step_id(), &thanks);
    assert!(session.store().blocks().is_empty());
    assert!(!session.store().history().can_undo());
    assert_eq!(session.store().status(), DocumentStatus::Clean);

    // Discarded edits were never written
    session.switch_step(&landing, &NeverDiscard).await.unwrap();
    assert!(session.store().blocks().is_empty());
}

#[tokio::test]
async fn test_clean_switch_skips_gate() {
    let (mut session, _) = open_funnel(&["landing", "thanks"]).await;
    let thanks = session.funnel().steps[1].id.clone();

    session.store_mut().insert_block(BlockKind::Form, None).unwrap();
    session.save().await.unwrap();

    session.switch_step(&thanks, &NeverDiscard).await.unwrap();
    assert_eq!(session.active_step_id(), &thanks);
}

#[tokio::test]
async fn test_save_failure_keeps_document_dirty() {
    let (mut session, gateway) = open_funnel(&["landing"]).await;
    session.store_mut().insert_block(BlockKind::Button, None).unwrap();

    gateway.fail_saves(true);
    let result = session.save().await;
    assert!(matches!(result, Err(WorkspaceError::PersistenceFailure(_))));
    assert!(session.has_unsaved_changes());

    // Explicit retry
    gateway.fail_saves(false);
    session.save().await.unwrap();
    assert!(!session.has_unsaved_changes());
}

#[tokio::test]
async fn test_edit_during_save_stays_dirty() {
    let (mut session, gateway) = open_funnel(&["landing"]).await;
    gateway.set_save_delay(Duration::from_millis(20));

    session.store_mut().insert_block(BlockKind::Headline, None).unwrap();
    let saved_revision = session.begin_save();
    assert!(session.is_saving());

    session.store_mut().insert_block(BlockKind::Text, None).unwrap();
    session.finish_save().await.unwrap();

    assert!(session.has_unsaved_changes());
    assert!(session.store().revision() > saved_revision);
    assert_eq!(session.active_step().unwrap().content.len(), 1);
}

#[tokio::test]
async fn test_newer_save_wins() {
    let (mut session, gateway) = open_funnel(&["landing"]).await;
    gateway.set_save_delay(Duration::from_millis(30));
    let step = session.active_step_id().clone();

    session.store_mut().insert_block(BlockKind::Headline, None).unwrap();
    session.begin_save();
    session.store_mut().insert_block(BlockKind::Spacer, None).unwrap();
    session.begin_save();
    session.finish_save().await.unwrap();

    assert!(!session.has_unsaved_changes());
    assert_eq!(gateway.completed_saves(), 1);

    let stored = gateway.stored_step(&step).await.unwrap();
    assert_eq!(stored["blocks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_legacy_step_content_loads_normalized() {
    let gateway = Arc::new(MemoryGateway::new());
    let funnel = Funnel::with_landing_step("legacy", "Old funnel");
    let step = funnel.steps[0].id.clone();
    gateway.put_funnel(&funnel).await;
    gateway
        .put_step_raw(
            &step,
            json!([
                { "id": "a", "type": "headline", "content": { "text": "Old" } },
                { "id": "a", "type": "checkout", "content": { "enableCard": false } },
                { "id": "c", "type": "marquee", "content": {} }
            ]),
        )
        .await;

    let mut session = EditorSession::open(gateway, "legacy", EditorConfig::default())
        .await
        .unwrap();

    let store = session.store_mut();
    assert_eq!(store.blocks().len(), 2);
    assert_ne!(store.blocks()[0].id, store.blocks()[1].id);
    assert!(store.blocks()[1].content.as_checkout().unwrap().enable_card);
    assert_eq!(store.page_settings().background_color, "#ffffff");
    assert!(!store.is_dirty());
    assert_eq!(store.take_notices().len(), 1);
}
