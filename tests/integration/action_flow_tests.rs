//! Save, save-as, start and attach through the screen.

use std::sync::atomic::Ordering;

use inspector_session::launch::LaunchContext;
use inspector_session::models::server::ServerType;
use inspector_session::models::tabs::WorkflowTab;
use inspector_session::screen::SessionConfigOrchestrator;
use inspector_session::AppError;
use serde_json::json;
use uuid::Uuid;

use super::test_helpers::{caps, remote, screen, FakeBackend};

async fn opened_with_saved_session(
    backend: &std::sync::Arc<FakeBackend>,
) -> (SessionConfigOrchestrator, Uuid) {
    let uuid = backend.add_saved(
        "pixel",
        caps(&[("platformName", json!("Android"))]),
        remote("grid.local"),
    );
    let mut screen = screen(backend, LaunchContext::default());
    screen.initialize().await;
    screen.wait_for_discovery().await;
    (screen, uuid)
}

#[tokio::test]
async fn loaded_saved_session_is_clean_until_edited() {
    let backend = FakeBackend::new();
    let (mut screen, uuid) = opened_with_saved_session(&backend).await;

    screen.load_saved_session(uuid).unwrap();

    assert_eq!(screen.caps().uuid(), Some(uuid));
    assert_eq!(screen.server().host, "grid.local");
    assert!(!screen.is_dirty());
    assert!(!screen.availability().save);

    let err = screen.save().await.unwrap_err();
    assert!(matches!(err, AppError::ActionDisabled(_)));

    screen.set_capability("appium:udid", json!("R58M"));
    assert!(screen.is_dirty());
    assert!(screen.availability().save);
}

#[tokio::test]
async fn save_overwrites_the_saved_entry() {
    let backend = FakeBackend::new();
    let (mut screen, uuid) = opened_with_saved_session(&backend).await;
    screen.load_saved_session(uuid).unwrap();
    screen.set_capability("platformName", json!("iOS"));

    let saved = screen.save().await.unwrap();

    assert_eq!(saved.uuid, uuid);
    assert_eq!(saved.name, "pixel");
    assert!(!screen.is_dirty());
    let stored = backend.saved.lock().unwrap()[0].clone();
    assert_eq!(stored.caps.get("platformName"), Some(&json!("iOS")));
    assert_eq!(screen.saved_sessions()[0].caps, stored.caps);
}

#[tokio::test]
async fn unsaved_caps_cannot_be_saved() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;
    screen.set_capability("platformName", json!("Android"));

    assert!(screen.is_dirty());
    let err = screen.save().await.unwrap_err();
    assert!(matches!(err, AppError::ActionDisabled(_)));
    assert!(backend.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn load_unknown_saved_session_fails() {
    let backend = FakeBackend::new();
    let (mut screen, _) = opened_with_saved_session(&backend).await;

    let err = screen.load_saved_session(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(screen.caps().is_empty());
}

#[tokio::test]
async fn save_as_opens_prompt_then_adopts_new_identity() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;
    screen.set_capability("platformName", json!("Android"));

    screen.save_as().unwrap();
    assert_eq!(backend.save_as_requested.load(Ordering::SeqCst), 1);

    let saved = screen.complete_save_as("  android smoke ").await.unwrap();

    assert_eq!(saved.name, "android smoke");
    assert_eq!(screen.caps().uuid(), Some(saved.uuid));
    assert!(!screen.is_dirty());
    assert_eq!(screen.saved_sessions().len(), 1);
    assert!(screen.workflow_tabs().iter().all(|entry| entry.enabled));
}

#[tokio::test]
async fn save_as_rejects_blank_names() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;

    let err = screen.complete_save_as("   ").await.unwrap_err();

    assert!(matches!(err, AppError::ActionDisabled(_)));
    assert!(backend.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn start_launches_with_active_caps_and_remembers_servers() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;
    screen.set_capability("platformName", json!("Android"));
    screen.set_server_params(remote("device-farm"));

    screen.start().await.unwrap();

    let launches = backend.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].server.host, "device-farm");
    assert_eq!(launches[0].server_type, ServerType::Remote);
    assert_eq!(
        launches[0].caps.as_ref().unwrap().get("platformName"),
        Some(&json!("Android"))
    );
    assert!(launches[0].attach_session_id.is_none());
    assert!(screen.session_began());
    assert!(!screen.loading());

    let persisted = backend.persisted_servers.lock().unwrap().clone();
    assert_eq!(persisted.len(), 1);
    assert!(persisted[0].iter().any(|s| s.host == "device-farm"));
}

#[tokio::test]
async fn failed_start_clears_loading_without_beginning() {
    let backend = FakeBackend::new();
    backend.fail_launch.store(true, Ordering::SeqCst);
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;

    let err = screen.start().await.unwrap_err();

    assert!(matches!(err, AppError::Session(_)));
    assert!(!screen.loading());
    assert!(!screen.session_began());
}

#[tokio::test]
async fn attach_requires_attach_tab_and_target() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;

    let err = screen.attach().await.unwrap_err();
    assert!(matches!(err, AppError::ActionDisabled(_)));

    assert!(screen.select_workflow_tab(WorkflowTab::Attach));
    let err = screen.attach().await.unwrap_err();
    assert!(matches!(err, AppError::ActionDisabled(_)));

    screen.select_attach_target(Some("5f1c".into()));
    screen.attach().await.unwrap();

    let launches = backend.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].attach_session_id.as_deref(), Some("5f1c"));
    assert!(launches[0].caps.is_none());
    assert!(screen.session_began());
}

#[tokio::test]
async fn attaching_disables_start_and_save_as() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;
    screen.select_workflow_tab(WorkflowTab::Attach);

    assert!(matches!(
        screen.start().await.unwrap_err(),
        AppError::ActionDisabled(_)
    ));
    assert!(matches!(
        screen.save_as().unwrap_err(),
        AppError::ActionDisabled(_)
    ));
    assert_eq!(backend.save_as_requested.load(Ordering::SeqCst), 0);
    assert!(backend.launches().is_empty());
}

#[tokio::test]
async fn leaving_attach_tab_drops_the_target() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;
    screen.select_workflow_tab(WorkflowTab::Attach);
    screen.select_attach_target(Some("5f1c".into()));

    screen.select_workflow_tab(WorkflowTab::New);
    screen.select_workflow_tab(WorkflowTab::Attach);

    assert_eq!(screen.attach_target(), None);
    assert!(!screen.availability().attach);
}

#[tokio::test]
async fn capability_docs_open_externally() {
    let backend = FakeBackend::new();
    let screen = screen(&backend, LaunchContext::default());

    screen.open_capability_docs();

    let links = backend.links.lock().unwrap().clone();
    assert_eq!(links.len(), 1);
    assert!(links[0].contains("caps"));
}

#[tokio::test]
async fn new_capability_set_forgets_identity() {
    let backend = FakeBackend::new();
    let (mut screen, uuid) = opened_with_saved_session(&backend).await;
    screen.load_saved_session(uuid).unwrap();

    screen.new_capability_set();

    assert!(screen.caps().is_empty());
    assert_eq!(screen.caps().uuid(), None);
    assert!(screen.is_dirty());
    assert!(!screen.availability().save);
}
