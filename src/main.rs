#![forbid(unsafe_code)]

//! `inspector-session`: headless session-configuration screen.
//!
//! Opens the screen once with the given launch inputs, runs its startup
//! sequence and prints the resulting state as JSON. With `--watch` the
//! screen stays open and handles host commands read from stdin until
//! `close`, end of input, or a termination signal.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use inspector_session::config::GlobalConfig;
use inspector_session::discovery::HttpSessionDirectory;
use inspector_session::host::{LoggedSurfaces, StdinHost};
use inspector_session::launch::LaunchContext;
use inspector_session::launcher::HttpSessionLauncher;
use inspector_session::models::tabs::ServerTab;
use inspector_session::persistence::session_file::JsonSessionFiles;
use inspector_session::persistence::settings::JsonSettingsStore;
use inspector_session::screen::init::InitReport;
use inspector_session::screen::orchestrator::{ScreenOptions, SessionConfigOrchestrator};
use inspector_session::services::Services;
use inspector_session::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "inspector-session", about = "Session configuration screen", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Capability file to open the screen with.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Launch query string, e.g. `?state=%7B%22caps%22%3A%7B%7D%7D`.
    #[arg(long)]
    query: Option<String>,

    /// Keep the screen open and read host commands from stdin.
    #[arg(long)]
    watch: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("inspector-session bootstrap");

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let config = GlobalConfig::load_from_path(&args.config)?;
    info!(store = %config.settings_path().display(), "configuration loaded");

    // ── Wire collaborators ──────────────────────────────
    let settings = Arc::new(
        JsonSettingsStore::new(config.settings_path())
            .with_local_server(config.local_server.clone()),
    );
    let host = Arc::new(StdinHost::new());
    let surfaces = Arc::new(LoggedSurfaces);
    let timeout = config.discovery.timeout();

    let services = Services {
        saved_sessions: settings.clone(),
        server_params: settings.clone(),
        visibility: settings,
        directory: Arc::new(HttpSessionDirectory::new(timeout)),
        files: Arc::new(JsonSessionFiles),
        host: host.clone(),
        provider_selector: surfaces.clone(),
        save_as_prompt: surfaces.clone(),
        links: surfaces,
        launcher: Arc::new(HttpSessionLauncher::new(timeout)),
    };
    let launch = LaunchContext {
        query: args.query,
        file: args.file,
    };

    // ── Open the screen ─────────────────────────────────
    let mut screen =
        SessionConfigOrchestrator::new(services, launch, ScreenOptions::from_config(&config));
    let initial = screen.initialize().await;
    if let Some((step, err)) = &initial.report.failed {
        warn!(%step, %err, "screen opened with partial state");
    }
    screen.wait_for_discovery().await;
    print_state(&screen, &initial.report)?;

    if args.watch {
        tokio::select! {
            () = screen.run_until_closed() => {}
            () = shutdown_signal() => info!("shutdown signal received"),
        }
        host.close();
        screen.close();
        print_state(&screen, &initial.report)?;
    }

    info!("inspector-session finished");
    Ok(())
}

fn print_state(screen: &SessionConfigOrchestrator, report: &InitReport) -> Result<()> {
    let tabs = screen.server_tabs();
    let server_tabs: Vec<&str> = tabs.iter().map(ServerTab::key).collect();
    let state = json!({
        "snapshot": screen.snapshot(),
        "report": report,
        "availability": screen.availability(),
        "serverTabs": server_tabs,
        "workflowTabs": screen.workflow_tabs(),
        "runningSessions": screen.running_sessions(),
    });
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Wait for SIGTERM or Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
