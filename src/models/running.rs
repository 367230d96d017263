//! Handles of sessions already running on a server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A running session reported by the server's session directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningSession {
    /// Session identifier used to attach.
    pub id: String,
    /// Capabilities the session was created with.
    #[serde(default)]
    pub capabilities: Value,
}
