//! Error types shared across the crate.

use std::fmt::{Display, Formatter};

/// Shared crate result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error enumeration covering every failure mode of the session screen.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// File-system or I/O operation failure.
    Io(String),
    /// Settings or saved-session storage failure.
    Store(String),
    /// Malformed query string, capability file or JSON payload.
    Parse(String),
    /// Running-session discovery failure.
    Discovery(String),
    /// Unknown or reserved cloud provider key.
    Provider(String),
    /// An action was invoked while its preconditions did not hold.
    ActionDisabled(String),
    /// Session launch or attach rejected by the session service.
    Session(String),
    /// Requested entity does not exist.
    NotFound(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
            Self::Store(msg) => write!(f, "store: {msg}"),
            Self::Parse(msg) => write!(f, "parse: {msg}"),
            Self::Discovery(msg) => write!(f, "discovery: {msg}"),
            Self::Provider(msg) => write!(f, "provider: {msg}"),
            Self::ActionDisabled(msg) => write!(f, "action disabled: {msg}"),
            Self::Session(msg) => write!(f, "session: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Discovery(err.to_string())
    }
}
