//! Ordered startup pipeline of the session screen.
//!
//! Steps run strictly in [`InitStep::ORDER`]; each is awaited before the
//! next one starts, so later sources override earlier ones: launch file
//! over query string over local server over saved defaults. Discovery is
//! the exception: the step only asks the sink to spawn it.
//!
//! The first failing step ends the sequence. What was applied before it is
//! kept and the screen stays usable.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};

use crate::launch::query::parse_query_string;
use crate::launch::LaunchContext;
use crate::models::patch::StatePatch;
use crate::models::saved::SavedSession;
use crate::models::tabs::WorkflowTab;
use crate::services::{HostEvent, Services};
use crate::Result;

/// One step of the startup pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStep {
    /// Hand the teardown token to the host window.
    BindTeardown,
    /// Select the `new` workflow tab.
    ForceNewTab,
    /// Load saved capability sets.
    LoadSavedSessions,
    /// Load saved default server parameters.
    LoadSavedServerParams,
    /// Load local-scope server parameters.
    LoadLocalServerParams,
    /// Load visible provider keys.
    LoadVisibleProviders,
    /// Spawn running-session discovery.
    DiscoverRunningSessions,
    /// Apply launch query-string overrides.
    ParseQueryString,
    /// Apply the launch capability file.
    LoadLaunchFile,
    /// Subscribe to host file events.
    SubscribeHostEvents,
}

impl InitStep {
    /// Execution order.
    pub const ORDER: [Self; 10] = [
        Self::BindTeardown,
        Self::ForceNewTab,
        Self::LoadSavedSessions,
        Self::LoadSavedServerParams,
        Self::LoadLocalServerParams,
        Self::LoadVisibleProviders,
        Self::DiscoverRunningSessions,
        Self::ParseQueryString,
        Self::LoadLaunchFile,
        Self::SubscribeHostEvents,
    ];
}

impl fmt::Display for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a step produced for the screen to apply.
#[derive(Debug)]
pub enum StepOutput {
    /// Nothing to apply.
    Nothing,
    /// Select this workflow tab.
    WorkflowTab(WorkflowTab),
    /// Replace the saved-session list.
    SavedSessions(Vec<SavedSession>),
    /// Apply a partial state.
    Patch(StatePatch),
    /// Replace the visible provider keys.
    VisibleProviders(Vec<String>),
    /// Spawn running-session discovery against the active server.
    SpawnDiscovery,
    /// Apply a capability file and remember its path.
    File(PathBuf, StatePatch),
    /// Keep this host event subscription.
    HostEvents(mpsc::UnboundedReceiver<HostEvent>),
}

/// Receives step outputs in order.
pub trait StepSink {
    /// Apply the output of `step`.
    fn apply(&mut self, step: InitStep, output: StepOutput);
}

/// How the startup sequence ended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    /// Steps whose output was applied.
    pub completed: Vec<InitStep>,
    /// Step that failed, with its error message.
    pub failed: Option<(InitStep, String)>,
    /// Whether the screen closed before the sequence finished.
    pub abandoned: bool,
    /// Whether this call was a repeat that did nothing.
    pub skipped: bool,
}

/// Runs the startup steps against the screen's sources.
pub struct InitializationSequencer<'a> {
    services: &'a Services,
    launch: &'a LaunchContext,
}

impl<'a> InitializationSequencer<'a> {
    /// Sequencer over `services` and the activation's launch inputs.
    #[must_use]
    pub fn new(services: &'a Services, launch: &'a LaunchContext) -> Self {
        Self { services, launch }
    }

    /// Run every step in order, feeding outputs to `sink`.
    ///
    /// Stops once `teardown` is cancelled. Never fails: a step error is
    /// logged and recorded in the report.
    pub async fn run<S: StepSink>(
        &self,
        teardown: &CancellationToken,
        sink: &mut S,
    ) -> InitReport {
        let mut report = InitReport::default();
        let span = info_span!("initialize");

        async {
            for step in InitStep::ORDER {
                if teardown.is_cancelled() {
                    info!(%step, "screen closed, abandoning startup");
                    report.abandoned = true;
                    return;
                }
                match self.execute(step, teardown).await {
                    Ok(output) => {
                        if teardown.is_cancelled() {
                            info!(%step, "screen closed, discarding step result");
                            report.abandoned = true;
                            return;
                        }
                        debug!(%step, "startup step done");
                        sink.apply(step, output);
                        report.completed.push(step);
                    }
                    Err(err) => {
                        error!(%step, %err, "startup step failed");
                        report.failed = Some((step, err.to_string()));
                        return;
                    }
                }
            }
            info!("startup complete");
        }
        .instrument(span)
        .await;

        report
    }

    /// Execute a single step.
    ///
    /// # Errors
    ///
    /// Returns whatever the step's source reports.
    pub async fn execute(
        &self,
        step: InitStep,
        teardown: &CancellationToken,
    ) -> Result<StepOutput> {
        let services = self.services;
        let output = match step {
            InitStep::BindTeardown => {
                services.host.bind_window_close(teardown.clone());
                StepOutput::Nothing
            }
            InitStep::ForceNewTab => StepOutput::WorkflowTab(WorkflowTab::New),
            InitStep::LoadSavedSessions => {
                StepOutput::SavedSessions(services.saved_sessions.list().await?)
            }
            InitStep::LoadSavedServerParams => {
                StepOutput::Patch(services.server_params.load_saved().await?)
            }
            InitStep::LoadLocalServerParams => {
                StepOutput::Patch(services.server_params.load_local().await?)
            }
            InitStep::LoadVisibleProviders => {
                StepOutput::VisibleProviders(services.visibility.load_visible().await?)
            }
            InitStep::DiscoverRunningSessions => StepOutput::SpawnDiscovery,
            InitStep::ParseQueryString => match self.launch.query.as_deref() {
                Some(query) => StepOutput::Patch(parse_query_string(query)?),
                None => StepOutput::Nothing,
            },
            InitStep::LoadLaunchFile => match &self.launch.file {
                Some(path) => {
                    let file = services.files.load(path.clone()).await?;
                    StepOutput::File(path.clone(), file.into_patch())
                }
                None => StepOutput::Nothing,
            },
            InitStep::SubscribeHostEvents => StepOutput::HostEvents(services.host.subscribe()),
        };
        Ok(output)
    }
}
