//! Global configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::models::server::{Protocol, ServerParams, ServerType};
use crate::{AppError, Result};

/// Running-session discovery settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DiscoveryConfig {
    /// Whether discovery requests are issued at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Upper bound for a single discovery request.
    #[serde(default = "default_discovery_timeout")]
    pub timeout_seconds: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_seconds: default_discovery_timeout(),
        }
    }
}

impl DiscoveryConfig {
    /// Discovery timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Connection details of an automation server already running on this host.
///
/// Surfaced to the screen as local-scope server parameters, overriding
/// the saved defaults for the `remote` server type.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LocalServerConfig {
    /// Host name or address.
    #[serde(default = "default_local_host")]
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Base path of the `WebDriver` endpoint.
    #[serde(default = "default_local_path")]
    pub path: String,
    /// Whether the server speaks TLS.
    #[serde(default)]
    pub protocol: Protocol,
}

impl LocalServerConfig {
    /// Convert into connection parameters for the built-in server type.
    #[must_use]
    pub fn to_server_params(&self) -> ServerParams {
        ServerParams {
            server_type: ServerType::Remote,
            host: self.host.clone(),
            port: Some(self.port),
            path: self.path.clone(),
            protocol: self.protocol,
            auth: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_discovery_timeout() -> u64 {
    5
}

fn default_local_host() -> String {
    "127.0.0.1".into()
}

fn default_local_path() -> String {
    "/".into()
}

fn default_docs_url() -> String {
    "http://appium.io/docs/en/writing-running-appium/caps/index.html".into()
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Directory holding `settings.json`.
    pub store_dir: PathBuf,
    /// Capability documentation page opened from the screen footer.
    #[serde(default = "default_docs_url")]
    pub docs_url: String,
    /// Running-session discovery settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Optional locally running server.
    #[serde(default)]
    pub local_server: Option<LocalServerConfig>,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the JSON settings file inside the store directory.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.store_dir.join("settings.json")
    }

    fn validate(&self) -> Result<()> {
        if self.store_dir.as_os_str().is_empty() {
            return Err(AppError::Config("store_dir must not be empty".into()));
        }

        if self.discovery.timeout_seconds == 0 {
            return Err(AppError::Config(
                "discovery.timeout_seconds must be greater than zero".into(),
            ));
        }

        if !(self.docs_url.starts_with("http://") || self.docs_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "docs_url must be an http(s) URL: {}",
                self.docs_url
            )));
        }

        if let Some(local) = &self.local_server {
            if local.port == 0 {
                return Err(AppError::Config(
                    "local_server.port must be greater than zero".into(),
                ));
            }
        }

        Ok(())
    }
}
