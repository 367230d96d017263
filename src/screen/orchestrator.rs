//! Composition of the session screen.
//!
//! [`SessionConfigOrchestrator`] owns tab state, the dirty tracker and the
//! provider registry, and decides which capability set and which server
//! parameters are active. It is driven from a single task through
//! `&mut self`; the only concurrent piece is running-session discovery,
//! which runs detached and publishes through a watch channel.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::actions::{ActionAvailability, ActionGateway, ActionInputs};
use super::context::ScreenContext;
use super::dirty::CapabilityDirtyTracker;
use super::init::{InitReport, InitStep, InitializationSequencer, StepOutput, StepSink};
use super::tabs::{ServerTabOutcome, TabNavigationController};
use crate::config::GlobalConfig;
use crate::launch::LaunchContext;
use crate::models::caps::CapabilitySet;
use crate::models::patch::StatePatch;
use crate::models::running::RunningSession;
use crate::models::saved::SavedSession;
use crate::models::server::{ServerParams, ServerType};
use crate::models::tabs::{ServerTab, TabState, WorkflowTab, WorkflowTabEntry};
use crate::persistence::session_file::SessionFile;
use crate::providers::CloudProviderRegistry;
use crate::services::{HostEvent, Services};
use crate::{AppError, Result};

const DEFAULT_REMOTE_HOST: &str = "127.0.0.1";
const DEFAULT_REMOTE_PORT: u16 = 4723;

/// Screen settings taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenOptions {
    /// Capability documentation URL.
    pub docs_url: String,
    /// Whether running-session discovery runs.
    pub discovery_enabled: bool,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            docs_url: "http://appium.io/docs/en/writing-running-appium/caps/index.html".into(),
            discovery_enabled: true,
        }
    }
}

impl ScreenOptions {
    /// Options from the global configuration.
    #[must_use]
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self {
            docs_url: config.docs_url.clone(),
            discovery_enabled: config.discovery.enabled,
        }
    }
}

/// Fields the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSnapshot {
    /// Tab selections.
    pub tab_state: TabState,
    /// Visible provider keys.
    pub visible_providers: Vec<String>,
    /// Active capabilities.
    pub caps: CapabilitySet,
    /// Identity of the active capabilities.
    pub caps_uuid: Option<Uuid>,
    /// Active server parameters.
    pub server: ServerParams,
    /// Active server type.
    pub server_type: ServerType,
    /// Whether the active capabilities have unsaved changes.
    pub is_dirty: bool,
    /// Running session chosen for attach.
    pub attach_target: Option<String>,
    /// Whether a start or attach is in flight.
    pub loading: bool,
    /// Whether a session has been started from this screen.
    pub session_began: bool,
    /// Number of saved capability sets.
    pub saved_session_count: usize,
    /// Capability file the screen is bound to.
    pub file_path: Option<PathBuf>,
}

/// Result of [`SessionConfigOrchestrator::initialize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialState {
    /// State after the startup sequence.
    pub snapshot: ScreenSnapshot,
    /// How the sequence ended.
    pub report: InitReport,
}

/// The session-configuration screen.
pub struct SessionConfigOrchestrator {
    services: Services,
    launch: LaunchContext,
    options: ScreenOptions,
    context: ScreenContext,
    registry: CloudProviderRegistry,
    tabs: TabNavigationController,
    dirty: CapabilityDirtyTracker,
    actions: ActionGateway,
    caps: CapabilitySet,
    servers: BTreeMap<ServerType, ServerParams>,
    saved_sessions: Vec<SavedSession>,
    running_tx: Arc<watch::Sender<Vec<RunningSession>>>,
    running_rx: watch::Receiver<Vec<RunningSession>>,
    discovery: Option<JoinHandle<()>>,
    host_events: Option<mpsc::UnboundedReceiver<HostEvent>>,
    file_path: Option<PathBuf>,
    visible_loaded: bool,
    loading: bool,
    session_began: bool,
}

impl SessionConfigOrchestrator {
    /// Screen for one activation with the built-in provider catalog.
    #[must_use]
    pub fn new(services: Services, launch: LaunchContext, options: ScreenOptions) -> Self {
        let registry = CloudProviderRegistry::new(Arc::clone(&services.provider_selector));
        Self::with_registry(services, launch, options, registry)
    }

    /// Screen for one activation with a custom provider registry.
    #[must_use]
    pub fn with_registry(
        services: Services,
        launch: LaunchContext,
        options: ScreenOptions,
        registry: CloudProviderRegistry,
    ) -> Self {
        let actions = ActionGateway::new(
            Arc::clone(&services.saved_sessions),
            Arc::clone(&services.save_as_prompt),
            Arc::clone(&services.launcher),
        );
        let (running_tx, running_rx) = watch::channel(Vec::new());
        Self {
            services,
            launch,
            options,
            context: ScreenContext::new(),
            registry,
            tabs: TabNavigationController::new(),
            dirty: CapabilityDirtyTracker::new(),
            actions,
            caps: CapabilitySet::new(),
            servers: BTreeMap::new(),
            saved_sessions: Vec::new(),
            running_tx: Arc::new(running_tx),
            running_rx,
            discovery: None,
            host_events: None,
            file_path: None,
            visible_loaded: false,
            loading: false,
            session_began: false,
        }
    }

    // ── Startup ─────────────────────────────────────────

    /// Run the startup sequence once for this activation.
    ///
    /// Step failures are logged and reported, never returned. A repeated
    /// call returns the current state with `report.skipped` set.
    pub async fn initialize(&mut self) -> InitialState {
        if !self.context.begin_init() {
            warn!("startup already ran for this screen activation");
            return InitialState {
                snapshot: self.snapshot(),
                report: InitReport {
                    skipped: true,
                    ..InitReport::default()
                },
            };
        }

        let services = self.services.clone();
        let launch = self.launch.clone();
        let teardown = self.context.teardown_token();
        let report = InitializationSequencer::new(&services, &launch)
            .run(&teardown, self)
            .await;
        if !self.visible_loaded {
            self.visible_loaded = true;
            self.reconcile_server_type();
        }
        self.context.finish_init();

        InitialState {
            snapshot: self.snapshot(),
            report,
        }
    }

    /// Tear the screen down: stop startup, drop host subscriptions and
    /// ignore discovery results still in flight.
    pub fn close(&mut self) {
        self.context.close();
        self.host_events = None;
        info!("session screen closed");
    }

    /// Per-activation context.
    #[must_use]
    pub fn context(&self) -> &ScreenContext {
        &self.context
    }

    fn apply_patch(&mut self, patch: StatePatch) {
        for server in patch.servers {
            self.servers.insert(server.server_type.clone(), server);
        }
        if let Some(server_type) = patch.server_type {
            self.restore_server_type(server_type);
        }
        if let Some(mut caps) = patch.caps {
            caps.set_uuid(None);
            self.caps = caps;
            self.dirty.clear();
        }
    }

    /// Commit a server type from a startup source, a file or a saved set.
    ///
    /// Until the visible providers are known any catalog provider is
    /// accepted; [`Self::reconcile_server_type`] checks it afterwards.
    fn restore_server_type(&mut self, server_type: ServerType) {
        if let ServerType::Provider(key) = &server_type {
            if self.registry.lookup(key).is_none() {
                warn!(provider = %key, "ignoring unknown provider as server type");
                return;
            }
            if self.visible_loaded && !self.registry.is_visible(key) {
                warn!(provider = %key, "ignoring provider without a tab as server type");
                return;
            }
        }
        self.ensure_server(&server_type);
        self.tabs.restore_server_type(server_type);
    }

    /// Fall back to `remote` when the selected provider has no tab.
    fn reconcile_server_type(&mut self) {
        let ServerType::Provider(key) = self.tabs.server_type().clone() else {
            return;
        };
        if !self.registry.is_visible(&key) {
            warn!(provider = %key, "selected provider has no tab, falling back to remote");
            self.ensure_server(&ServerType::Remote);
            self.tabs.restore_server_type(ServerType::Remote);
        }
    }

    fn default_params(&self, server_type: &ServerType) -> ServerParams {
        match server_type {
            ServerType::Remote => {
                let mut params = ServerParams::empty(ServerType::Remote);
                params.host = DEFAULT_REMOTE_HOST.into();
                params.port = Some(DEFAULT_REMOTE_PORT);
                params
            }
            ServerType::Provider(key) => self
                .registry
                .lookup(key)
                .map_or_else(|| ServerParams::empty(server_type.clone()), |d| (d.panel)().defaults),
        }
    }

    fn ensure_server(&mut self, server_type: &ServerType) {
        if !self.servers.contains_key(server_type) {
            let params = self.default_params(server_type);
            self.servers.insert(server_type.clone(), params);
        }
    }

    // ── Running sessions ────────────────────────────────

    /// Start a detached discovery pass against the active server.
    ///
    /// A pass still running is aborted first. Failures publish an empty
    /// list; results arriving after teardown are dropped.
    pub fn refresh_running_sessions(&mut self) {
        if let Some(previous) = self.discovery.take() {
            previous.abort();
        }
        if !self.options.discovery_enabled {
            self.running_tx.send_replace(Vec::new());
            return;
        }

        let server = self.server();
        let span = info_span!("discover_running_sessions", server_type = %server.server_type);
        let directory = Arc::clone(&self.services.directory);
        let tx = Arc::clone(&self.running_tx);
        let teardown = self.context.teardown_token();

        self.discovery = Some(tokio::spawn(
            async move {
                let sessions = match directory.discover(server).await {
                    Ok(sessions) => sessions,
                    Err(err) => {
                        warn!(%err, "running session discovery failed");
                        Vec::new()
                    }
                };
                if teardown.is_cancelled() {
                    debug!("screen closed, dropping discovery result");
                    return;
                }
                info!(count = sessions.len(), "running sessions discovered");
                tx.send_replace(sessions);
            }
            .instrument(span),
        ));
    }

    /// Wait for the current discovery pass, if any, to finish.
    pub async fn wait_for_discovery(&mut self) {
        if let Some(handle) = self.discovery.take() {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    warn!(%err, "discovery task failed");
                }
            }
        }
    }

    /// Latest discovered running sessions.
    #[must_use]
    pub fn running_sessions(&self) -> Vec<RunningSession> {
        self.running_rx.borrow().clone()
    }

    /// Receiver notified whenever discovery publishes.
    #[must_use]
    pub fn watch_running_sessions(&self) -> watch::Receiver<Vec<RunningSession>> {
        self.running_rx.clone()
    }

    // ── Tabs ────────────────────────────────────────────

    /// Select a workflow tab; returns whether it changed.
    pub fn select_workflow_tab(&mut self, tab: WorkflowTab) -> bool {
        self.tabs.select_workflow_tab(tab)
    }

    /// Choose the running session to attach to.
    pub fn select_attach_target(&mut self, session_id: Option<String>) -> bool {
        self.tabs.select_attach_target(session_id)
    }

    /// Select a server-type tab.
    ///
    /// # Errors
    ///
    /// Returns the error that rejected the change; the previous tab stays.
    pub async fn select_server_type_tab(&mut self, tab: ServerTab) -> Result<ServerTabOutcome> {
        let store = Arc::clone(&self.services.server_params);
        let outcome = self
            .tabs
            .select_server_type_tab(tab, &self.registry, move |server_type| async move {
                store.persist_server_type(server_type).await
            })
            .await?;

        if let ServerTabOutcome::Switched { to, .. } = &outcome {
            let to = to.clone();
            self.ensure_server(&to);
            self.refresh_running_sessions();
        }
        Ok(outcome)
    }

    /// Server tabs in display order.
    #[must_use]
    pub fn server_tabs(&self) -> Vec<ServerTab> {
        TabNavigationController::server_tabs(&self.registry)
    }

    /// Workflow tabs in display order.
    #[must_use]
    pub fn workflow_tabs(&self) -> Vec<WorkflowTabEntry> {
        TabNavigationController::workflow_tabs(self.saved_sessions.len())
    }

    // ── Providers ───────────────────────────────────────

    /// Provider registry.
    #[must_use]
    pub fn registry(&self) -> &CloudProviderRegistry {
        &self.registry
    }

    /// Open the provider selection surface.
    pub fn add_cloud_provider(&self) {
        self.registry.add_provider();
    }

    /// Show a catalog provider as a tab and persist the visible set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` for unknown keys, or the store error;
    /// the visible set is unchanged on error.
    pub async fn show_provider(&mut self, key: &str) -> Result<bool> {
        if !self.registry.show_provider(key)? {
            return Ok(false);
        }
        if let Err(err) = self.persist_visible().await {
            self.registry.remove_provider(key);
            return Err(err);
        }
        Ok(true)
    }

    /// Hide a provider tab and persist the visible set.
    ///
    /// Hiding the selected provider switches back to `remote`.
    ///
    /// # Errors
    ///
    /// Returns the store error from persisting or from switching servers;
    /// the visible set is unchanged when persisting fails.
    pub async fn remove_provider(&mut self, key: &str) -> Result<bool> {
        let previous = self.registry.visible().to_vec();
        if !self.registry.remove_provider(key) {
            return Ok(false);
        }
        if let Err(err) = self.persist_visible().await {
            self.registry.set_visible(previous);
            return Err(err);
        }
        if matches!(self.tabs.server_type(), ServerType::Provider(current) if current == key) {
            self.select_server_type_tab(ServerTab::Server(ServerType::Remote))
                .await?;
        }
        Ok(true)
    }

    async fn persist_visible(&self) -> Result<()> {
        self.services
            .visibility
            .persist_visible(self.registry.visible().to_vec())
            .await
    }

    // ── Capabilities & servers ──────────────────────────

    /// Active capabilities.
    #[must_use]
    pub fn caps(&self) -> &CapabilitySet {
        &self.caps
    }

    /// Set one capability in the active set.
    pub fn set_capability(&mut self, name: impl Into<String>, value: Value) {
        self.caps.insert(name, value);
    }

    /// Remove one capability from the active set.
    pub fn remove_capability(&mut self, name: &str) -> Option<Value> {
        self.caps.remove(name)
    }

    /// Replace the active set with an empty, unsaved one.
    pub fn new_capability_set(&mut self) {
        self.caps = CapabilitySet::new();
        self.dirty.clear();
    }

    /// Make a saved capability set active, with its server.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no saved set has `uuid`.
    pub fn load_saved_session(&mut self, uuid: Uuid) -> Result<()> {
        let saved = self
            .saved_sessions
            .iter()
            .find(|s| s.uuid == uuid)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("saved session {uuid} not found")))?;

        self.caps = saved.identified_caps();
        self.dirty.mark_saved(&self.caps);
        self.servers.insert(saved.server_type.clone(), saved.server);
        self.restore_server_type(saved.server_type);
        info!(%uuid, name = %saved.name, "saved session loaded");
        Ok(())
    }

    /// Reload the saved-session list.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    pub async fn reload_saved_sessions(&mut self) -> Result<()> {
        self.saved_sessions = self.services.saved_sessions.list().await?;
        Ok(())
    }

    /// Saved capability sets.
    #[must_use]
    pub fn saved_sessions(&self) -> &[SavedSession] {
        &self.saved_sessions
    }

    /// Replace the parameters of the server type they name.
    pub fn set_server_params(&mut self, params: ServerParams) {
        self.servers.insert(params.server_type.clone(), params);
    }

    /// Active server parameters.
    #[must_use]
    pub fn server(&self) -> ServerParams {
        let server_type = self.tabs.server_type();
        self.servers
            .get(server_type)
            .cloned()
            .unwrap_or_else(|| self.default_params(server_type))
    }

    /// Active server type.
    #[must_use]
    pub fn server_type(&self) -> &ServerType {
        self.tabs.server_type()
    }

    // ── State ───────────────────────────────────────────

    /// Tab selections.
    #[must_use]
    pub fn tab_state(&self) -> &TabState {
        self.tabs.state()
    }

    /// Visible provider keys.
    #[must_use]
    pub fn visible_providers(&self) -> &[String] {
        self.registry.visible()
    }

    /// Whether the active capabilities have unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty(&self.caps)
    }

    /// Running session chosen for attach.
    #[must_use]
    pub fn attach_target(&self) -> Option<&str> {
        self.tabs.attach_target()
    }

    /// Whether a start or attach is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Whether a session was started from this screen.
    #[must_use]
    pub fn session_began(&self) -> bool {
        self.session_began
    }

    /// Capability file the screen is bound to.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Everything the presentation layer renders.
    #[must_use]
    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            tab_state: self.tabs.state().clone(),
            visible_providers: self.registry.visible().to_vec(),
            caps: self.caps.clone(),
            caps_uuid: self.caps.uuid(),
            server: self.server(),
            server_type: self.tabs.server_type().clone(),
            is_dirty: self.is_dirty(),
            attach_target: self.attach_target().map(ToOwned::to_owned),
            loading: self.loading,
            session_began: self.session_began,
            saved_session_count: self.saved_sessions.len(),
            file_path: self.file_path.clone(),
        }
    }

    // ── Actions ─────────────────────────────────────────

    fn action_inputs<'a>(&'a self, server: &'a ServerParams) -> ActionInputs<'a> {
        ActionInputs {
            workflow_tab: self.tabs.workflow_tab(),
            caps: &self.caps,
            dirty: self.is_dirty(),
            attach_target: self.tabs.attach_target(),
            server,
            server_type: self.tabs.server_type(),
        }
    }

    /// Which actions are enabled.
    #[must_use]
    pub fn availability(&self) -> ActionAvailability {
        let server = self.server();
        ActionAvailability::evaluate(&self.action_inputs(&server))
    }

    /// Overwrite the saved set the active capabilities came from.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` if save is disabled, or the store error.
    pub async fn save(&mut self) -> Result<SavedSession> {
        let server = self.server();
        let saved = self.actions.save(&self.action_inputs(&server)).await?;
        self.dirty.mark_saved(&self.caps);
        self.refresh_saved_list().await;
        Ok(saved)
    }

    /// Open the save-as naming surface.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` while attaching.
    pub fn save_as(&self) -> Result<()> {
        let server = self.server();
        self.actions.save_as(&self.action_inputs(&server))
    }

    /// Finish save-as: persist under `name` and adopt the new identity.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` while attaching or for a blank
    /// name, or the store error.
    pub async fn complete_save_as(&mut self, name: &str) -> Result<SavedSession> {
        let server = self.server();
        let saved = self
            .actions
            .complete_save_as(&self.action_inputs(&server), name)
            .await?;
        self.caps.set_uuid(Some(saved.uuid));
        self.dirty.mark_saved(&self.caps);
        self.refresh_saved_list().await;
        Ok(saved)
    }

    async fn refresh_saved_list(&mut self) {
        if let Err(err) = self.reload_saved_sessions().await {
            warn!(%err, "failed to reload saved sessions");
        }
    }

    /// Start a new session from the active capabilities.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` while attaching, or the launcher error.
    pub async fn start(&mut self) -> Result<()> {
        if !self.availability().start {
            return Err(AppError::ActionDisabled(
                "start is unavailable while attaching".into(),
            ));
        }
        self.remember_servers().await;
        self.loading = true;
        let server = self.server();
        let result = self.actions.start(&self.action_inputs(&server)).await;
        self.finish_launch(result)
    }

    /// Attach to the chosen running session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` unless attaching with a target,
    /// or the launcher error.
    pub async fn attach(&mut self) -> Result<()> {
        if !self.availability().attach {
            return Err(AppError::ActionDisabled(
                "attach needs the attach tab and a running session".into(),
            ));
        }
        self.remember_servers().await;
        self.loading = true;
        let server = self.server();
        let result = self.actions.attach(&self.action_inputs(&server)).await;
        self.finish_launch(result)
    }

    fn finish_launch(&mut self, result: Result<()>) -> Result<()> {
        self.loading = false;
        if result.is_ok() {
            self.session_began = true;
        }
        result
    }

    async fn remember_servers(&self) {
        let servers: Vec<ServerParams> = self.servers.values().cloned().collect();
        if let Err(err) = self.services.server_params.persist_servers(servers).await {
            warn!(%err, "failed to remember server parameters");
        }
    }

    /// Open the capability documentation in the system browser.
    pub fn open_capability_docs(&self) {
        self.services.links.open_external(&self.options.docs_url);
    }

    // ── Capability files ────────────────────────────────

    /// Load a capability file and bind the screen to it.
    ///
    /// # Errors
    ///
    /// Returns the file loader's error; state is unchanged on error.
    pub async fn load_file(&mut self, path: PathBuf) -> Result<()> {
        let file = self.services.files.load(path.clone()).await?;
        self.apply_patch(file.into_patch());
        info!(path = %path.display(), "capability file applied");
        self.file_path = Some(path);
        Ok(())
    }

    /// Save the active configuration to `path`, or to the bound file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if neither a path nor a bound file
    /// exists, or the file writer's error.
    pub async fn save_file(&mut self, path: Option<PathBuf>) -> Result<PathBuf> {
        let target = path
            .or_else(|| self.file_path.clone())
            .ok_or_else(|| AppError::NotFound("no capability file to save to".into()))?;
        let file = SessionFile::new(
            self.tabs.server_type().clone(),
            self.server(),
            self.caps.clone(),
        );
        self.services.files.save(target.clone(), file).await?;
        self.file_path = Some(target.clone());
        Ok(target)
    }

    // ── Host events ─────────────────────────────────────

    /// React to one host event.
    ///
    /// # Errors
    ///
    /// Returns the error of the file load or save it triggered.
    pub async fn handle_host_event(&mut self, event: HostEvent) -> Result<()> {
        debug!(?event, "host event");
        match event {
            HostEvent::OpenFile(path) => self.load_file(path).await,
            HostEvent::SaveFile(path) => self.save_file(path).await.map(|_| ()),
        }
    }

    /// Wait for the next host event; `None` once the screen closes or the
    /// host drops the channel.
    pub async fn next_host_event(&mut self) -> Option<HostEvent> {
        let teardown = self.context.teardown_token();
        let events = self.host_events.as_mut()?;
        tokio::select! {
            () = teardown.cancelled() => None,
            event = events.recv() => event,
        }
    }

    /// Handle host events already queued; returns how many were handled.
    pub async fn process_pending_host_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let Some(Ok(event)) = self
                .host_events
                .as_mut()
                .map(mpsc::UnboundedReceiver::try_recv)
            else {
                break;
            };
            if let Err(err) = self.handle_host_event(event).await {
                warn!(%err, "host event failed");
            }
            handled += 1;
        }
        handled
    }

    /// Handle host events until the screen closes.
    pub async fn run_until_closed(&mut self) {
        while let Some(event) = self.next_host_event().await {
            if let Err(err) = self.handle_host_event(event).await {
                warn!(%err, "host event failed");
            }
        }
        debug!("host event loop finished");
    }
}

impl StepSink for SessionConfigOrchestrator {
    fn apply(&mut self, step: InitStep, output: StepOutput) {
        match output {
            StepOutput::Nothing => {}
            StepOutput::WorkflowTab(tab) => {
                self.tabs.select_workflow_tab(tab);
            }
            StepOutput::SavedSessions(list) => {
                debug!(%step, count = list.len(), "saved sessions loaded");
                self.saved_sessions = list;
            }
            StepOutput::Patch(patch) => {
                if !patch.is_empty() {
                    debug!(%step, "applying state patch");
                }
                self.apply_patch(patch);
            }
            StepOutput::VisibleProviders(keys) => {
                self.registry.set_visible(keys);
                self.visible_loaded = true;
                self.reconcile_server_type();
            }
            StepOutput::SpawnDiscovery => self.refresh_running_sessions(),
            StepOutput::File(path, patch) => {
                self.apply_patch(patch);
                info!(path = %path.display(), "launch capability file applied");
                self.file_path = Some(path);
            }
            StepOutput::HostEvents(events) => self.host_events = Some(events),
        }
    }
}
