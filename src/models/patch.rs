//! Partial screen state contributed by an initialization source.

use serde::Deserialize;

use super::caps::CapabilitySet;
use super::server::{ServerParams, ServerType};

/// What a source contributes to the starting state.
///
/// Absent parts leave the current state untouched; present parts replace it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePatch {
    /// Capabilities to make active.
    #[serde(default)]
    pub caps: Option<CapabilitySet>,
    /// Server parameters, one per server type.
    #[serde(default)]
    pub servers: Vec<ServerParams>,
    /// Server type to select.
    #[serde(default)]
    pub server_type: Option<ServerType>,
}

impl StatePatch {
    /// Whether the patch carries nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.caps.is_none() && self.servers.is_empty() && self.server_type.is_none()
    }

    /// Patch that only sets capabilities.
    #[must_use]
    pub fn with_caps(caps: CapabilitySet) -> Self {
        Self {
            caps: Some(caps),
            ..Self::default()
        }
    }
}
