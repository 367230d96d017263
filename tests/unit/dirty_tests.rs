use inspector_session::models::caps::CapabilitySet;
use inspector_session::screen::dirty::{is_dirty, CapabilityDirtyTracker};
use serde_json::json;
use uuid::Uuid;

#[test]
fn equal_sets_are_clean() {
    let active = CapabilitySet::from_entries([("a", json!(1))]);
    let saved = CapabilitySet::from_entries([("a", json!(1))]);
    assert!(!is_dirty(&active, Some(&saved)));
}

#[test]
fn added_capability_is_dirty() {
    let active = CapabilitySet::from_entries([("a", json!(1)), ("b", json!(2))]);
    let saved = CapabilitySet::from_entries([("a", json!(1))]);
    assert!(is_dirty(&active, Some(&saved)));
}

#[test]
fn never_saved_is_dirty() {
    assert!(is_dirty(&CapabilitySet::new(), None));
}

#[test]
fn reordering_is_not_a_change() {
    let active = CapabilitySet::from_entries([("b", json!(2)), ("a", json!(1))]);
    let saved = CapabilitySet::from_entries([("a", json!(1)), ("b", json!(2))]);
    assert!(!is_dirty(&active, Some(&saved)));
}

#[test]
fn tracker_follows_saves_and_edits() {
    let mut tracker = CapabilityDirtyTracker::new();
    let mut caps = CapabilitySet::from_entries([("a", json!(1))]).with_uuid(Uuid::new_v4());
    assert!(tracker.is_dirty(&caps));

    tracker.mark_saved(&caps);
    assert!(!tracker.is_dirty(&caps));
    assert_eq!(tracker.snapshot(), Some(&caps));

    caps.insert("a", json!(2));
    assert!(tracker.is_dirty(&caps));

    caps.insert("a", json!(1));
    assert!(!tracker.is_dirty(&caps));

    tracker.clear();
    assert!(tracker.is_dirty(&caps));
    assert!(tracker.snapshot().is_none());
}
