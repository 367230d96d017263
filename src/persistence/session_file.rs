//! Capability file format.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "serverType": "remote",
//!   "server": { "serverType": "remote", "host": "127.0.0.1", "port": 4723, "path": "/" },
//!   "caps": { "platformName": "Android", "appium:deviceName": "emulator-5554" }
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{read_optional, write_atomic};
use crate::models::caps::CapabilitySet;
use crate::models::patch::StatePatch;
use crate::models::server::{ServerParams, ServerType};
use crate::services::{BoxFuture, CapabilityFileIo};
use crate::{AppError, Result};

/// Format version written by this crate.
pub const SESSION_FILE_VERSION: &str = "1.0";

/// Contents of a capability file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    /// Format version.
    pub version: String,
    /// Server type active when the file was written.
    #[serde(default)]
    pub server_type: ServerType,
    /// Parameters of that server.
    #[serde(default)]
    pub server: Option<ServerParams>,
    /// Capabilities.
    #[serde(default)]
    pub caps: CapabilitySet,
}

impl SessionFile {
    /// Snapshot the active configuration.
    #[must_use]
    pub fn new(server_type: ServerType, server: ServerParams, caps: CapabilitySet) -> Self {
        Self {
            version: SESSION_FILE_VERSION.to_owned(),
            server_type,
            server: Some(server),
            caps,
        }
    }

    /// Parse and version-check a capability file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Parse` for invalid JSON or an unsupported version.
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: Self = serde_json::from_str(raw)?;
        if file.version != SESSION_FILE_VERSION {
            return Err(AppError::Parse(format!(
                "unsupported capability file version {}",
                file.version
            )));
        }
        Ok(file)
    }

    /// Convert into the state this file contributes.
    #[must_use]
    pub fn into_patch(self) -> StatePatch {
        let servers = self
            .server
            .map(|mut server| {
                server.server_type = self.server_type.clone();
                server
            })
            .into_iter()
            .collect();
        StatePatch {
            caps: Some(self.caps),
            servers,
            server_type: Some(self.server_type),
        }
    }
}

/// Reads and writes capability files as JSON on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSessionFiles;

impl CapabilityFileIo for JsonSessionFiles {
    fn load(&self, path: PathBuf) -> BoxFuture<'_, Result<SessionFile>> {
        Box::pin(async move {
            let raw = read_optional(&path)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("{} does not exist", path.display())))?;
            let file = SessionFile::from_json(&raw)?;
            info!(path = %path.display(), caps = file.caps.len(), "capability file loaded");
            Ok(file)
        })
    }

    fn save(&self, path: PathBuf, file: SessionFile) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let bytes = serde_json::to_vec_pretty(&file)?;
            write_atomic(&path, bytes).await?;
            info!(path = %path.display(), "capability file saved");
            Ok(())
        })
    }
}
