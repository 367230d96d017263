//! Host file events and window teardown.

use std::path::PathBuf;

use inspector_session::launch::LaunchContext;
use inspector_session::models::server::ServerType;
use inspector_session::persistence::session_file::SessionFile;
use inspector_session::services::HostEvent;
use serde_json::json;

use super::test_helpers::{caps, remote, screen, FakeBackend};

#[tokio::test]
async fn open_file_event_applies_the_file() {
    let backend = FakeBackend::new();
    let path = PathBuf::from("/caps/ios.json");
    backend.put_file(
        path.clone(),
        SessionFile::new(
            ServerType::Remote,
            remote("mac-mini"),
            caps(&[("platformName", json!("iOS"))]),
        ),
    );
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;

    backend.send_host_event(HostEvent::OpenFile(path.clone()));
    assert_eq!(screen.process_pending_host_events().await, 1);

    assert_eq!(screen.caps().get("platformName"), Some(&json!("iOS")));
    assert_eq!(screen.server().host, "mac-mini");
    assert_eq!(screen.file_path(), Some(path.as_path()));
    assert!(screen.is_dirty());
}

#[tokio::test]
async fn save_file_event_writes_to_the_open_file() {
    let backend = FakeBackend::new();
    let path = PathBuf::from("/caps/android.json");
    backend.put_file(
        path.clone(),
        SessionFile::new(ServerType::Remote, remote("h"), caps(&[])),
    );
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;

    backend.send_host_event(HostEvent::OpenFile(path.clone()));
    screen.process_pending_host_events().await;
    screen.set_capability("platformName", json!("Android"));
    backend.send_host_event(HostEvent::SaveFile(None));
    assert_eq!(screen.process_pending_host_events().await, 1);

    let written = backend.file(&path).unwrap();
    assert_eq!(written.caps.get("platformName"), Some(&json!("Android")));
    assert_eq!(written.server_type, ServerType::Remote);
    assert_eq!(written.server.unwrap().host, "h");
}

#[tokio::test]
async fn save_file_to_new_path_rebinds_the_screen() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;
    screen.set_capability("a", json!(1));

    let target = screen
        .save_file(Some(PathBuf::from("/out/a.json")))
        .await
        .unwrap();

    assert_eq!(target, PathBuf::from("/out/a.json"));
    assert_eq!(screen.file_path(), Some(target.as_path()));
    assert!(backend.file(&target).is_some());
}

#[tokio::test]
async fn save_without_any_file_fails_but_keeps_processing() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;

    assert!(screen.save_file(None).await.is_err());

    backend.send_host_event(HostEvent::SaveFile(None));
    backend.send_host_event(HostEvent::OpenFile(PathBuf::from("/missing.json")));
    assert_eq!(screen.process_pending_host_events().await, 2);
    assert!(screen.file_path().is_none());
}

#[tokio::test]
async fn window_close_ends_the_event_loop() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;

    backend.close_window();

    assert!(screen.context().is_closed());
    assert_eq!(screen.next_host_event().await, None);
    screen.run_until_closed().await;
}

#[tokio::test]
async fn run_until_closed_handles_events_then_stops() {
    let backend = FakeBackend::new();
    let path = PathBuf::from("/caps/web.json");
    backend.put_file(
        path.clone(),
        SessionFile::new(
            ServerType::Remote,
            remote("h"),
            caps(&[("browserName", json!("chrome"))]),
        ),
    );
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;

    backend.send_host_event(HostEvent::OpenFile(path));
    *backend.host_tx.lock().unwrap() = None;
    screen.run_until_closed().await;

    assert_eq!(screen.caps().get("browserName"), Some(&json!("chrome")));
}

#[tokio::test]
async fn closed_screen_ignores_host_events() {
    let backend = FakeBackend::new();
    let mut screen = screen(&backend, LaunchContext::default());
    screen.initialize().await;

    screen.close();

    assert_eq!(screen.process_pending_host_events().await, 0);
    assert_eq!(screen.next_host_event().await, None);
}
