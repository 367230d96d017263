//! Launch context of a screen activation: query string and capability file.

pub mod query;

use std::path::PathBuf;

/// Inputs the screen was opened with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchContext {
    /// Raw query string, with or without the leading `?`.
    pub query: Option<String>,
    /// Capability file to load on startup.
    pub file: Option<PathBuf>,
}
