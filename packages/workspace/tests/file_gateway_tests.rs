//! File-backed storage through the public session API

use anyhow::Result;
use funnel_blocks::BlockKind;
use funnel_editor::{DocumentStore, EditorConfig};
use funnel_workspace::{
    AlwaysDiscard, EditorSession, Funnel, JsonFileGateway, PersistenceGateway, SaveCoordinator, StaticCatalog, StepId,
    WorkspaceError,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_create_edit_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let gateway = Arc::new(JsonFileGateway::new(dir.path()));
    gateway.create_funnel(&Funnel::with_landing_step("f1", "Launch")).await?;

    {
        let mut session = EditorSession::open(gateway.clone(), "f1", EditorConfig::default()).await?;
        let store = session.store_mut();
        let id = store.insert_block(BlockKind::Headline, None)?;
        store.update_block_content(&id, json!({ "text": "Persisted" }).as_object().unwrap());
        session.save().await?;
    }

    let session = EditorSession::open(gateway, "f1", EditorConfig::default()).await?;
    assert_eq!(session.store().blocks().len(), 1);
    assert_eq!(session.store().blocks()[0].content.to_value()["text"], "Persisted");
    assert!(!session.has_unsaved_changes());
    Ok(())
}

#[tokio::test]
async fn test_create_refuses_existing_funnel() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let gateway = JsonFileGateway::new(dir.path());
    gateway.create_funnel(&Funnel::with_landing_step("f1", "Launch")).await?;

    let err = gateway
        .create_funnel(&Funnel::with_landing_step("f1", "Again"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::PersistenceFailure(_)));
    Ok(())
}

#[tokio::test]
async fn test_template_replaces_step_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let gateway = Arc::new(JsonFileGateway::new(dir.path()));
    let funnel = Funnel::with_landing_step("f1", "Launch");
    let old_step = funnel.steps[0].id.clone();
    gateway.create_funnel(&funnel).await?;

    let catalog = StaticCatalog::builtin()?;
    let mut session = EditorSession::open(gateway.clone(), "f1", EditorConfig::default()).await?;
    session.apply_template(&catalog, "webinar", &AlwaysDiscard).await?;

    assert!(!dir.path().join(format!("steps/{}.json", old_step)).exists());

    let reloaded = gateway.load_funnel("f1").await?;
    assert_eq!(reloaded.name, "Launch");
    assert_eq!(reloaded.steps, session.funnel().steps);
    assert_eq!(reloaded.steps[0].content.page_settings().background_color, "#101828");
    Ok(())
}

#[tokio::test]
async fn test_hand_written_legacy_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("steps"))?;
    std::fs::write(
        dir.path().join("steps/old.json"),
        json!([{ "id": "x", "type": "text", "content": { "text": "Legacy" } }]).to_string(),
    )?;

    let gateway = JsonFileGateway::new(dir.path());
    let raw = gateway.load_step(&StepId::from_raw("old")).await?;
    assert!(raw.is_array());

    let missing = gateway.load_step(&StepId::from_raw("never-saved")).await?;
    assert!(missing.is_null());
    Ok(())
}

#[tokio::test]
async fn test_missing_funnel() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let gateway = JsonFileGateway::new(dir.path());

    let err = gateway.load_funnel("nope").await.unwrap_err();
    assert!(matches!(err, WorkspaceError::FunnelNotFound(_)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_superseded_saves_leave_no_temp_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let gateway: Arc<dyn PersistenceGateway> = Arc::new(JsonFileGateway::new(dir.path()));
    let mut saves = SaveCoordinator::new(gateway.clone());
    let step = StepId::from_raw("s1");
    let mut store = DocumentStore::default();

    for attempt in 0..40u64 {
        store.insert_block(BlockKind::Text, None)?;
        saves.begin(step.clone(), store.document().clone(), store.revision());
        // Land the second save at varying points of the first one's write
        tokio::time::sleep(Duration::from_micros((attempt % 10) * 50)).await;

        store.insert_block(BlockKind::Spacer, None)?;
        saves.begin(step.clone(), store.document().clone(), store.revision());
        let outcome = saves.finish().await.expect("save was pending");
        assert!(outcome.is_saved());

        let names: Vec<String> = std::fs::read_dir(dir.path().join("steps"))?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<std::io::Result<_>>()?;
        assert_eq!(names, vec!["s1.json".to_string()], "attempt {}", attempt);
    }

    // The newest snapshot is what landed
    let stored = gateway.load_step(&step).await?;
    assert_eq!(stored, store.document().to_value());
    Ok(())
}
