//! Server connection targets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Tab key of the built-in automation server.
pub const REMOTE_KEY: &str = "remote";

/// Tab key of the "select cloud providers" pseudo-tab.
pub const ADD_CLOUD_PROVIDER_KEY: &str = "addCloudProvider";

/// Whether `key` names a tab identity that can never be a provider.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    key == REMOTE_KEY || key == ADD_CLOUD_PROVIDER_KEY
}

/// Which server a set of connection parameters belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ServerType {
    /// The built-in local/remote automation server.
    #[default]
    Remote,
    /// A cloud provider, identified by its catalog key.
    Provider(String),
}

impl ServerType {
    /// Parse a server type from its tab key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` for an empty key or the
    /// `addCloudProvider` pseudo-tab.
    pub fn parse(key: &str) -> Result<Self> {
        match key {
            REMOTE_KEY => Ok(Self::Remote),
            "" => Err(AppError::Provider("empty server type".into())),
            ADD_CLOUD_PROVIDER_KEY => Err(AppError::Provider(format!(
                "{ADD_CLOUD_PROVIDER_KEY} is not a server type"
            ))),
            other => Ok(Self::Provider(other.to_owned())),
        }
    }

    /// Tab key for this server type.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Remote => REMOTE_KEY,
            Self::Provider(key) => key,
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl TryFrom<String> for ServerType {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ServerType> for String {
    fn from(value: ServerType) -> Self {
        match value {
            ServerType::Remote => REMOTE_KEY.to_owned(),
            ServerType::Provider(key) => key,
        }
    }
}

/// Transport scheme of a server endpoint.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP.
    #[default]
    Http,
    /// HTTP over TLS.
    Https,
}

impl Protocol {
    /// URL scheme.
    #[must_use]
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Provider credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerAuth {
    /// Account user name.
    pub username: String,
    /// Access key or API token.
    pub access_key: String,
}

/// Connection target for one server type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerParams {
    /// Server type these parameters belong to.
    pub server_type: ServerType,
    /// Host name or address; empty when not yet entered.
    #[serde(default)]
    pub host: String,
    /// TCP port; the scheme default when absent.
    #[serde(default)]
    pub port: Option<u16>,
    /// Base path of the `WebDriver` endpoint.
    #[serde(default = "default_path")]
    pub path: String,
    /// Transport scheme.
    #[serde(default)]
    pub protocol: Protocol,
    /// Optional credentials.
    #[serde(default)]
    pub auth: Option<ServerAuth>,
}

fn default_path() -> String {
    "/".into()
}

impl ServerParams {
    /// Empty parameters for `server_type`.
    #[must_use]
    pub fn empty(server_type: ServerType) -> Self {
        Self {
            server_type,
            host: String::new(),
            port: None,
            path: default_path(),
            protocol: Protocol::Http,
            auth: None,
        }
    }

    /// Base URL of the endpoint, without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when no host has been entered.
    pub fn base_url(&self) -> Result<String> {
        if self.host.trim().is_empty() {
            return Err(AppError::Config(format!(
                "server {} has no host",
                self.server_type
            )));
        }
        let mut url = format!("{}://{}", self.protocol.scheme(), self.host.trim());
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        let path = self.path.trim().trim_end_matches('/');
        if !path.is_empty() {
            if !path.starts_with('/') {
                url.push('/');
            }
            url.push_str(path);
        }
        Ok(url)
    }
}
