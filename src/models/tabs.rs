//! Tab identities and the exclusive tab selection state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::server::{ServerType, ADD_CLOUD_PROVIDER_KEY};
use crate::{AppError, Result};

/// Workflow tab below the server selector.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowTab {
    /// Edit a new capability set.
    #[default]
    New,
    /// Pick a previously saved capability set.
    Saved,
    /// Attach to a running session.
    Attach,
}

impl WorkflowTab {
    /// All workflow tabs in display order.
    pub const ALL: [Self; 3] = [Self::New, Self::Saved, Self::Attach];

    /// Tab key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Saved => "saved",
            Self::Attach => "attach",
        }
    }
}

impl fmt::Display for WorkflowTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(Self::New),
            "saved" => Ok(Self::Saved),
            "attach" => Ok(Self::Attach),
            other => Err(AppError::Parse(format!("unknown workflow tab {other}"))),
        }
    }
}

/// A selectable server-type tab, including the "add provider" pseudo-tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServerTab {
    /// A real server type.
    Server(ServerType),
    /// Opens the provider selection surface; never a resting selection.
    AddCloudProvider,
}

impl ServerTab {
    /// Tab key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Server(server_type) => server_type.key(),
            Self::AddCloudProvider => ADD_CLOUD_PROVIDER_KEY,
        }
    }
}

impl FromStr for ServerTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if s == ADD_CLOUD_PROVIDER_KEY {
            Ok(Self::AddCloudProvider)
        } else {
            ServerType::parse(s).map(Self::Server)
        }
    }
}

impl From<ServerType> for ServerTab {
    fn from(value: ServerType) -> Self {
        Self::Server(value)
    }
}

/// Current tab selections.
///
/// `server_type_tab` is a [`ServerType`], so the pseudo-tab cannot be stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabState {
    /// Selected server type.
    pub server_type_tab: ServerType,
    /// Selected workflow tab.
    pub workflow_tab: WorkflowTab,
}

/// A workflow tab as listed for rendering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowTabEntry {
    /// Tab identity.
    pub tab: WorkflowTab,
    /// Whether the tab can currently be chosen.
    pub enabled: bool,
}
