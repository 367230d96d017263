use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inspector_session::models::server::{is_reserved_key, Protocol, ServerType};
use inspector_session::providers::{CloudProviderRegistry, BUILTIN_PROVIDERS};
use inspector_session::services::ProviderSelector;
use inspector_session::AppError;

#[derive(Default)]
struct CountingSelector(AtomicUsize);

impl ProviderSelector for CountingSelector {
    fn open(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn registry() -> (CloudProviderRegistry, Arc<CountingSelector>) {
    let selector = Arc::new(CountingSelector::default());
    (CloudProviderRegistry::new(selector.clone()), selector)
}

fn visible_keys(registry: &CloudProviderRegistry) -> Vec<&'static str> {
    registry.visible_descriptors().map(|d| d.key).collect()
}

#[test]
fn catalog_keys_are_unique_and_unreserved() {
    let mut seen = HashSet::new();
    for descriptor in BUILTIN_PROVIDERS {
        assert!(!is_reserved_key(descriptor.key), "{}", descriptor.key);
        assert!(seen.insert(descriptor.key), "duplicate {}", descriptor.key);
        assert!(!(descriptor.tab_head)().label.is_empty());
    }
}

#[test]
fn panel_defaults_belong_to_their_provider() {
    for descriptor in BUILTIN_PROVIDERS {
        let panel = (descriptor.panel)();
        assert_eq!(
            panel.defaults.server_type,
            ServerType::Provider(descriptor.key.into())
        );
        assert_eq!(panel.defaults.protocol, Protocol::Https);
        assert!(!panel.fields.is_empty());
    }
}

#[test]
fn set_visible_drops_reserved_empty_and_duplicate_keys() {
    let (mut registry, _) = registry();
    registry.set_visible(["sauce", "remote", "", "addCloudProvider", "sauce", "kobiton"]);
    assert_eq!(registry.visible(), ["sauce", "kobiton"]);
}

#[test]
fn stale_keys_are_kept_but_not_rendered() {
    let (mut registry, _) = registry();
    registry.set_visible(["retired-cloud", "browserstack"]);
    assert_eq!(registry.visible(), ["retired-cloud", "browserstack"]);
    assert_eq!(visible_keys(&registry), ["browserstack"]);
}

#[test]
fn only_visible_catalog_entries_count_as_visible() {
    let (mut registry, _) = registry();
    registry.set_visible(["retired-cloud", "sauce"]);
    assert!(registry.is_visible("sauce"));
    assert!(!registry.is_visible("kobiton"));
    assert!(!registry.is_visible("retired-cloud"));
}

#[test]
fn show_provider_appends_catalog_entries_once() {
    let (mut registry, _) = registry();
    assert!(registry.show_provider("lambdatest").unwrap());
    assert!(registry.show_provider("bitbar").unwrap());
    assert!(!registry.show_provider("lambdatest").unwrap());
    assert_eq!(registry.visible(), ["lambdatest", "bitbar"]);
}

#[test]
fn show_provider_rejects_unknown_keys() {
    let (mut registry, _) = registry();
    let err = registry.show_provider("nowhere").unwrap_err();
    assert!(matches!(err, AppError::Provider(_)));
    assert!(registry.visible().is_empty());
}

#[test]
fn remove_provider_reports_presence() {
    let (mut registry, _) = registry();
    registry.set_visible(["sauce", "testingbot"]);
    assert!(registry.remove_provider("sauce"));
    assert!(!registry.remove_provider("sauce"));
    assert_eq!(registry.visible(), ["testingbot"]);
}

#[test]
fn add_provider_opens_selector() {
    let (registry, selector) = registry();
    registry.add_provider();
    assert_eq!(selector.0.load(Ordering::SeqCst), 1);
}

#[test]
fn lookup_finds_catalog_entries() {
    let (registry, _) = registry();
    assert_eq!(registry.lookup("experitest").map(|d| d.key), Some("experitest"));
    assert!(registry.lookup("remote").is_none());
    assert_eq!(registry.catalog().len(), BUILTIN_PROVIDERS.len());
}
