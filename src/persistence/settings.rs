//! JSON settings file backing saved sessions, server parameters and
//! provider visibility.
//!
//! All three stores share one document. Writes are read-modify-write under
//! an async mutex and land through [`write_atomic`], so a crash never
//! leaves a half-written file behind.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{read_optional, write_atomic};
use crate::config::LocalServerConfig;
use crate::models::caps::CapabilitySet;
use crate::models::patch::StatePatch;
use crate::models::saved::{SaveRequest, SavedSession};
use crate::models::server::{ServerParams, ServerType};
use crate::services::{BoxFuture, ProviderVisibilityStore, SavedSessionStore, ServerParamStore};
use crate::{AppError, Result};

/// On-disk settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    /// Saved capability sets.
    #[serde(default)]
    pub saved_sessions: Vec<SavedSession>,
    /// Last used parameters, one per server type.
    #[serde(default)]
    pub servers: Vec<ServerParams>,
    /// Last selected server type.
    #[serde(default)]
    pub server_type: Option<ServerType>,
    /// Capabilities pre-filled on a fresh screen.
    #[serde(default)]
    pub default_caps: Option<CapabilitySet>,
    /// Provider keys shown as tabs.
    #[serde(default)]
    pub visible_providers: Vec<String>,
}

/// Settings store over a single JSON file.
pub struct JsonSettingsStore {
    path: PathBuf,
    local_server: Option<LocalServerConfig>,
    write_lock: Mutex<()>,
}

impl JsonSettingsStore {
    /// Store backed by `path`; the file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            local_server: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Report `local_server` as local-scope server parameters.
    #[must_use]
    pub fn with_local_server(mut self, local_server: Option<LocalServerConfig>) -> Self {
        self.local_server = local_server;
        self
    }

    /// Path of the settings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings document; a missing file reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the file exists but is not a valid document.
    pub async fn read(&self) -> Result<SettingsDocument> {
        match read_optional(&self.path).await? {
            None => Ok(SettingsDocument::default()),
            Some(raw) if raw.trim().is_empty() => Ok(SettingsDocument::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|err| {
                AppError::Store(format!(
                    "invalid settings file {}: {err}",
                    self.path.display()
                ))
            }),
        }
    }

    async fn update<T, F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut SettingsDocument) -> Result<T>,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read().await?;
        let out = mutate(&mut doc)?;
        let bytes = serde_json::to_vec_pretty(&doc)?;
        write_atomic(&self.path, bytes).await?;
        Ok(out)
    }
}

fn upsert_session(doc: &mut SettingsDocument, request: SaveRequest) -> Result<SavedSession> {
    let now = Utc::now();
    if let Some(uuid) = request.uuid {
        let entry = doc
            .saved_sessions
            .iter_mut()
            .find(|s| s.uuid == uuid)
            .ok_or_else(|| AppError::NotFound(format!("saved session {uuid} not found")))?;
        entry.caps = request.caps;
        entry.server = request.server;
        entry.server_type = request.server_type;
        entry.date = now;
        if let Some(name) = request.name {
            entry.name = name;
        }
        return Ok(entry.clone());
    }

    let name = request
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Store("a new saved session needs a name".into()))?;
    let entry = SavedSession {
        uuid: Uuid::new_v4(),
        name,
        date: now,
        caps: request.caps,
        server: request.server,
        server_type: request.server_type,
    };
    doc.saved_sessions.push(entry.clone());
    Ok(entry)
}

impl SavedSessionStore for JsonSettingsStore {
    fn list(&self) -> BoxFuture<'_, Result<Vec<SavedSession>>> {
        Box::pin(async move { Ok(self.read().await?.saved_sessions) })
    }

    fn save(&self, request: SaveRequest) -> BoxFuture<'_, Result<SavedSession>> {
        Box::pin(async move {
            let saved = self.update(|doc| upsert_session(doc, request)).await?;
            info!(uuid = %saved.uuid, name = %saved.name, "saved session written");
            Ok(saved)
        })
    }
}

impl ServerParamStore for JsonSettingsStore {
    fn load_saved(&self) -> BoxFuture<'_, Result<StatePatch>> {
        Box::pin(async move {
            let doc = self.read().await?;
            Ok(StatePatch {
                caps: doc.default_caps,
                servers: doc.servers,
                server_type: doc.server_type,
            })
        })
    }

    fn load_local(&self) -> BoxFuture<'_, Result<StatePatch>> {
        Box::pin(async move {
            let Some(local) = &self.local_server else {
                debug!("no local server configured");
                return Ok(StatePatch::default());
            };
            Ok(StatePatch {
                servers: vec![local.to_server_params()],
                ..StatePatch::default()
            })
        })
    }

    fn persist_server_type(&self, server_type: ServerType) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.update(|doc| {
                doc.server_type = Some(server_type);
                Ok(())
            })
            .await
        })
    }

    fn persist_servers(&self, servers: Vec<ServerParams>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.update(|doc| {
                doc.servers = servers;
                Ok(())
            })
            .await
        })
    }
}

impl ProviderVisibilityStore for JsonSettingsStore {
    fn load_visible(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move { Ok(self.read().await?.visible_providers) })
    }

    fn persist_visible(&self, keys: Vec<String>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.update(|doc| {
                doc.visible_providers = keys;
                Ok(())
            })
            .await
        })
    }
}
