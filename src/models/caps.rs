//! Ordered capability sets.
//!
//! A [`CapabilitySet`] keeps capabilities in the order the user entered
//! them. On the wire it is a JSON object whose keys appear in that order;
//! the older array form `[{"name": .., "value": ..}]` is accepted when
//! reading.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

/// Ordered mapping of capability name to value, with an optional saved identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilitySet {
    entries: Vec<(String, Value)>,
    uuid: Option<Uuid>,
}

impl CapabilitySet {
    /// Create an empty, unsaved capability set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from `(name, value)` pairs; later duplicates replace earlier ones.
    #[must_use]
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut set = Self::new();
        for (name, value) in entries {
            set.insert(name, value);
        }
        set
    }

    /// Attach a saved identity.
    #[must_use]
    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    /// Saved identity, if this set has been persisted.
    #[must_use]
    pub fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    /// Replace the saved identity.
    pub fn set_uuid(&mut self, uuid: Option<Uuid>) {
        self.uuid = uuid;
    }

    /// Insert or replace a capability, keeping the position of an existing name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((name, value));
        None
    }

    /// Remove a capability by name.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Look up a capability value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Number of capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no capabilities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate capabilities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Compare entries by name and value, ignoring order and identity.
    #[must_use]
    pub fn same_entries(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        let lhs: BTreeMap<&str, &Value> = self.iter().collect();
        let rhs: BTreeMap<&str, &Value> = other.iter().collect();
        lhs == rhs
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct NamedCapability {
    name: String,
    value: Value,
}

struct CapabilitySetVisitor;

impl<'de> Visitor<'de> for CapabilitySetVisitor {
    type Value = CapabilitySet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a capability object or a list of {name, value} entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut set = CapabilitySet::new();
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            set.insert(name, value);
        }
        Ok(set)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut set = CapabilitySet::new();
        while let Some(entry) = access.next_element::<NamedCapability>()? {
            set.insert(entry.name, entry.value);
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for CapabilitySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CapabilitySetVisitor)
    }
}
