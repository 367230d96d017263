//! Contracts of the collaborators the session screen depends on.
//!
//! The orchestrator never talks to storage, the network or the host window
//! directly; it goes through these traits. Async operations return boxed
//! `Send` futures so implementations can be stored as `Arc<dyn Trait>`.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::caps::CapabilitySet;
use crate::models::patch::StatePatch;
use crate::models::running::RunningSession;
use crate::models::saved::{SaveRequest, SavedSession};
use crate::models::server::{ServerParams, ServerType};
use crate::persistence::session_file::SessionFile;
use crate::Result;

/// Boxed future returned by collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistent list of saved capability sets.
pub trait SavedSessionStore: Send + Sync {
    /// List every saved capability set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    fn list(&self) -> BoxFuture<'_, Result<Vec<SavedSession>>>;

    /// Create or update a saved capability set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if `request.uuid` names no entry, or
    /// `AppError::Store` if the write fails.
    fn save(&self, request: SaveRequest) -> BoxFuture<'_, Result<SavedSession>>;
}

/// Server connection parameters remembered between runs.
pub trait ServerParamStore: Send + Sync {
    /// Saved default server parameters, possibly with default capabilities.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    fn load_saved(&self) -> BoxFuture<'_, Result<StatePatch>>;

    /// Parameters of servers present in local scope.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if local scope cannot be inspected.
    fn load_local(&self) -> BoxFuture<'_, Result<StatePatch>>;

    /// Remember the selected server type.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the write fails.
    fn persist_server_type(&self, server_type: ServerType) -> BoxFuture<'_, Result<()>>;

    /// Remember the per-type server parameters.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the write fails.
    fn persist_servers(&self, servers: Vec<ServerParams>) -> BoxFuture<'_, Result<()>>;
}

/// Which cloud providers the user shows as tabs.
pub trait ProviderVisibilityStore: Send + Sync {
    /// Previously persisted visible provider keys.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    fn load_visible(&self) -> BoxFuture<'_, Result<Vec<String>>>;

    /// Persist the visible provider keys.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the write fails.
    fn persist_visible(&self, keys: Vec<String>) -> BoxFuture<'_, Result<()>>;
}

/// Lists sessions already running on a server.
pub trait SessionDirectory: Send + Sync {
    /// Discover running sessions on `server`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Discovery` if the server cannot be queried.
    fn discover(&self, server: ServerParams) -> BoxFuture<'_, Result<Vec<RunningSession>>>;
}

/// Reads and writes capability files.
pub trait CapabilityFileIo: Send + Sync {
    /// Read a capability file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` or `AppError::Parse` for unreadable files.
    fn load(&self, path: PathBuf) -> BoxFuture<'_, Result<SessionFile>>;

    /// Write a capability file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the write fails.
    fn save(&self, path: PathBuf, file: SessionFile) -> BoxFuture<'_, Result<()>>;
}

/// Events the host window delivers to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The user asked to open a capability file.
    OpenFile(PathBuf),
    /// The user asked to save the active file; `None` reuses the open file's path.
    SaveFile(Option<PathBuf>),
}

/// The host window the screen lives in.
pub trait HostChannel: Send + Sync {
    /// Cancel `teardown` when the window closes.
    fn bind_window_close(&self, teardown: CancellationToken);

    /// Subscribe to host events for the lifetime of the screen.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<HostEvent>;
}

/// Surface where the user picks cloud providers to show.
pub trait ProviderSelector: Send + Sync {
    /// Open the provider selection surface.
    fn open(&self);
}

/// Surface asking the user for a name under which to save.
pub trait SaveAsPrompt: Send + Sync {
    /// Open the naming surface.
    fn request_name(&self);
}

/// Opens URLs outside the application.
pub trait LinkOpener: Send + Sync {
    /// Open `url`; failures are the opener's concern.
    fn open_external(&self, url: &str);
}

/// What a session launch should do.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSessionRequest {
    /// Server to talk to.
    pub server: ServerParams,
    /// Server type of `server`.
    pub server_type: ServerType,
    /// Capabilities for a new session; `None` when attaching.
    pub caps: Option<CapabilitySet>,
    /// Running session to bind to instead of creating one.
    pub attach_session_id: Option<String>,
}

/// Starts or attaches to automation sessions.
pub trait SessionLauncher: Send + Sync {
    /// Begin a session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the server rejects the request.
    fn new_session(&self, request: NewSessionRequest) -> BoxFuture<'_, Result<()>>;
}

/// Every collaborator the screen needs, shared by reference count.
#[derive(Clone)]
pub struct Services {
    /// Saved capability sets.
    pub saved_sessions: Arc<dyn SavedSessionStore>,
    /// Server parameter persistence.
    pub server_params: Arc<dyn ServerParamStore>,
    /// Provider visibility persistence.
    pub visibility: Arc<dyn ProviderVisibilityStore>,
    /// Running-session discovery.
    pub directory: Arc<dyn SessionDirectory>,
    /// Capability file IO.
    pub files: Arc<dyn CapabilityFileIo>,
    /// Host window.
    pub host: Arc<dyn HostChannel>,
    /// Provider selection surface.
    pub provider_selector: Arc<dyn ProviderSelector>,
    /// Save-as naming surface.
    pub save_as_prompt: Arc<dyn SaveAsPrompt>,
    /// External link opener.
    pub links: Arc<dyn LinkOpener>,
    /// Session launcher.
    pub launcher: Arc<dyn SessionLauncher>,
}
