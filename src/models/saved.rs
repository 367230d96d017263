//! Saved capability sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::caps::CapabilitySet;
use super::server::{ServerParams, ServerType};

/// A capability set persisted in the saved-session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    /// Identity token.
    pub uuid: Uuid,
    /// User-chosen display name.
    pub name: String,
    /// Last time the entry was written.
    pub date: DateTime<Utc>,
    /// Saved capabilities.
    pub caps: CapabilitySet,
    /// Server the set was saved against.
    pub server: ServerParams,
    /// Server type the set was saved against.
    pub server_type: ServerType,
}

impl SavedSession {
    /// Capabilities tagged with this entry's identity.
    #[must_use]
    pub fn identified_caps(&self) -> CapabilitySet {
        self.caps.clone().with_uuid(self.uuid)
    }
}

/// Arguments for a saved-session write.
///
/// With `uuid` set the existing entry is updated; otherwise a new entry
/// is created under `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    /// Active server parameters.
    pub server: ServerParams,
    /// Active server type.
    pub server_type: ServerType,
    /// Capabilities to persist.
    pub caps: CapabilitySet,
    /// Identity of the entry to update.
    pub uuid: Option<Uuid>,
    /// Display name for a new entry.
    pub name: Option<String>,
}
