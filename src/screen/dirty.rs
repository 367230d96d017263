//! Unsaved-change detection for the active capability set.

use crate::models::caps::CapabilitySet;

/// Whether `active` differs from `saved`.
///
/// A set that was never saved counts as dirty. Entries are compared by
/// name and value; order and identity are ignored.
#[must_use]
pub fn is_dirty(active: &CapabilitySet, saved: Option<&CapabilitySet>) -> bool {
    saved.is_none_or(|snapshot| !active.same_entries(snapshot))
}

/// Holds the last-saved snapshot of the active capability set.
#[derive(Debug, Clone, Default)]
pub struct CapabilityDirtyTracker {
    snapshot: Option<CapabilitySet>,
}

impl CapabilityDirtyTracker {
    /// Tracker with nothing saved yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `active` has unsaved changes.
    #[must_use]
    pub fn is_dirty(&self, active: &CapabilitySet) -> bool {
        is_dirty(active, self.snapshot.as_ref())
    }

    /// Record `caps` as the persisted state.
    pub fn mark_saved(&mut self, caps: &CapabilitySet) {
        self.snapshot = Some(caps.clone());
    }

    /// Forget the snapshot, e.g. after loading an unsaved set.
    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    /// Last-saved snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<&CapabilitySet> {
        self.snapshot.as_ref()
    }
}
