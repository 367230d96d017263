use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inspector_session::models::server::ServerType;
use inspector_session::models::tabs::{ServerTab, WorkflowTab};
use inspector_session::providers::CloudProviderRegistry;
use inspector_session::screen::tabs::{ServerTabOutcome, TabNavigationController};
use inspector_session::services::ProviderSelector;
use inspector_session::AppError;

#[derive(Default)]
struct CountingSelector(AtomicUsize);

impl ProviderSelector for CountingSelector {
    fn open(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn sauce() -> ServerType {
    ServerType::Provider("sauce".into())
}

#[test]
fn starts_on_remote_and_new() {
    let tabs = TabNavigationController::new();
    assert_eq!(tabs.server_type(), &ServerType::Remote);
    assert_eq!(tabs.workflow_tab(), WorkflowTab::New);
    assert!(!tabs.is_attaching());
}

#[test]
fn workflow_selection_is_idempotent() {
    let mut tabs = TabNavigationController::new();
    assert!(tabs.select_workflow_tab(WorkflowTab::Saved));
    assert!(!tabs.select_workflow_tab(WorkflowTab::Saved));
    assert_eq!(tabs.workflow_tab(), WorkflowTab::Saved);
}

#[test]
fn attach_target_only_lives_on_the_attach_tab() {
    let mut tabs = TabNavigationController::new();
    assert!(!tabs.select_attach_target(Some("s1".into())));
    assert_eq!(tabs.attach_target(), None);

    tabs.select_workflow_tab(WorkflowTab::Attach);
    assert!(tabs.select_attach_target(Some("s1".into())));
    assert_eq!(tabs.attach_target(), Some("s1"));

    tabs.select_workflow_tab(WorkflowTab::New);
    tabs.select_workflow_tab(WorkflowTab::Attach);
    assert_eq!(tabs.attach_target(), None);
}

#[test]
fn empty_attach_target_clears_it() {
    let mut tabs = TabNavigationController::new();
    tabs.select_workflow_tab(WorkflowTab::Attach);
    tabs.select_attach_target(Some("s1".into()));
    tabs.select_attach_target(Some(String::new()));
    assert_eq!(tabs.attach_target(), None);
}

#[tokio::test]
async fn add_cloud_provider_keeps_selection_and_opens_selector() {
    let selector = Arc::new(CountingSelector::default());
    let registry = CloudProviderRegistry::new(selector.clone());
    let mut tabs = TabNavigationController::new();
    let called = Cell::new(false);

    let outcome = tabs
        .select_server_type_tab(ServerTab::AddCloudProvider, &registry, |_| {
            called.set(true);
            async { Ok(()) }
        })
        .await
        .unwrap();

    assert_eq!(outcome, ServerTabOutcome::ProviderSelectorOpened);
    assert_eq!(tabs.server_type(), &ServerType::Remote);
    assert_eq!(selector.0.load(Ordering::SeqCst), 1);
    assert!(!called.get());
}

#[tokio::test]
async fn switch_commits_after_change_succeeds() {
    let mut registry = CloudProviderRegistry::new(Arc::new(CountingSelector::default()));
    registry.set_visible(["sauce"]);
    let mut tabs = TabNavigationController::new();

    let outcome = tabs
        .select_server_type_tab(ServerTab::Server(sauce()), &registry, |to| async move {
            assert_eq!(to, ServerType::Provider("sauce".into()));
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ServerTabOutcome::Switched {
            from: ServerType::Remote,
            to: sauce(),
        }
    );
    assert_eq!(tabs.server_type(), &sauce());
}

#[tokio::test]
async fn failed_change_rolls_back() {
    let mut registry = CloudProviderRegistry::new(Arc::new(CountingSelector::default()));
    registry.set_visible(["sauce"]);
    let mut tabs = TabNavigationController::new();

    let err = tabs
        .select_server_type_tab(ServerTab::Server(sauce()), &registry, |_| async {
            Err(AppError::Store("disk full".into()))
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Store(_)));
    assert_eq!(tabs.server_type(), &ServerType::Remote);
}

#[tokio::test]
async fn reselecting_current_tab_skips_change() {
    let registry = CloudProviderRegistry::new(Arc::new(CountingSelector::default()));
    let mut tabs = TabNavigationController::new();
    let called = Cell::new(false);

    let outcome = tabs
        .select_server_type_tab(ServerTab::Server(ServerType::Remote), &registry, |_| {
            called.set(true);
            async { Ok(()) }
        })
        .await
        .unwrap();

    assert_eq!(outcome, ServerTabOutcome::Unchanged);
    assert!(!called.get());
}

#[tokio::test]
async fn provider_without_a_tab_is_rejected() {
    let registry = CloudProviderRegistry::new(Arc::new(CountingSelector::default()));
    let mut tabs = TabNavigationController::new();
    let called = Cell::new(false);

    let err = tabs
        .select_server_type_tab(ServerTab::Server(sauce()), &registry, |_| {
            called.set(true);
            async { Ok(()) }
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Provider(ref msg) if msg.contains("sauce")));
    assert_eq!(tabs.server_type(), &ServerType::Remote);
    assert!(!called.get());
}

#[tokio::test]
async fn unknown_provider_is_rejected() {
    let registry = CloudProviderRegistry::new(Arc::new(CountingSelector::default()));
    let mut tabs = TabNavigationController::new();

    let err = tabs
        .select_server_type_tab(
            ServerTab::Server(ServerType::Provider("gone".into())),
            &registry,
            |_| async { Ok(()) },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Provider(_)));
    assert_eq!(tabs.server_type(), &ServerType::Remote);
}

#[test]
fn server_tabs_wrap_visible_providers() {
    let mut registry = CloudProviderRegistry::new(Arc::new(CountingSelector::default()));
    registry.set_visible(["kobiton", "stale", "sauce"]);
    let keys: Vec<String> = TabNavigationController::server_tabs(&registry)
        .iter()
        .map(|tab| tab.key().to_owned())
        .collect();
    assert_eq!(keys, ["remote", "kobiton", "sauce", "addCloudProvider"]);
}

#[test]
fn saved_tab_disabled_without_saved_sessions() {
    let tabs = TabNavigationController::workflow_tabs(0);
    let saved = tabs.iter().find(|e| e.tab == WorkflowTab::Saved).unwrap();
    assert!(!saved.enabled);
    assert!(tabs
        .iter()
        .filter(|e| e.tab != WorkflowTab::Saved)
        .all(|e| e.enabled));

    let tabs = TabNavigationController::workflow_tabs(3);
    assert!(tabs.iter().all(|e| e.enabled));
}
