//! Headless host for running the session screen from a terminal.
//!
//! Host events arrive as line commands on stdin:
//!
//! ```text
//! open-file caps.json
//! save-file
//! save-file other.json
//! close
//! ```
//!
//! `close` plays the role of the window closing. The UI surfaces the screen
//! would open (provider selector, save-as prompt, external links) are
//! reported through the log.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::services::{HostChannel, HostEvent, LinkOpener, ProviderSelector, SaveAsPrompt};
use crate::{AppError, Result};

/// One line of host input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Forward an event to the screen.
    Event(HostEvent),
    /// Close the window.
    Close,
}

/// Parse one stdin line; blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns `AppError::Parse` for unknown commands or a missing path.
pub fn parse_host_command(line: &str) -> Result<Option<HostCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match verb {
        "open-file" => {
            if rest.is_empty() {
                return Err(AppError::Parse("open-file needs a path".into()));
            }
            HostCommand::Event(HostEvent::OpenFile(PathBuf::from(rest)))
        }
        "save-file" => HostCommand::Event(HostEvent::SaveFile(
            (!rest.is_empty()).then(|| PathBuf::from(rest)),
        )),
        "close" => HostCommand::Close,
        other => return Err(AppError::Parse(format!("unknown host command: {other}"))),
    };
    Ok(Some(command))
}

/// Host window backed by the process's standard input.
#[derive(Debug, Clone, Default)]
pub struct StdinHost {
    window: CancellationToken,
}

impl StdinHost {
    /// Host whose window is open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled when the window closes.
    #[must_use]
    pub fn window_token(&self) -> CancellationToken {
        self.window.clone()
    }

    /// Close the window.
    pub fn close(&self) {
        self.window.cancel();
    }
}

impl HostChannel for StdinHost {
    fn bind_window_close(&self, teardown: CancellationToken) {
        let window = self.window.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = window.cancelled() => {
                    debug!("window closed, tearing screen down");
                    teardown.cancel();
                }
                () = teardown.cancelled() => {}
            }
        });
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<HostEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let window = self.window.clone();
        let span = info_span!("host_stdin");

        tokio::spawn(
            async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                loop {
                    let line = tokio::select! {
                        () = window.cancelled() => break,
                        line = lines.next_line() => line,
                    };
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            debug!("stdin closed");
                            break;
                        }
                        Err(err) => {
                            warn!(%err, "failed to read host input");
                            break;
                        }
                    };
                    match parse_host_command(&line) {
                        Ok(Some(HostCommand::Event(event))) => {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                        Ok(Some(HostCommand::Close)) => {
                            info!("close requested");
                            window.cancel();
                            break;
                        }
                        Ok(None) => {}
                        Err(err) => warn!(%err, "ignoring host input"),
                    }
                }
            }
            .instrument(span),
        );

        rx
    }
}

/// Logs the surfaces a windowed host would open.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggedSurfaces;

impl ProviderSelector for LoggedSurfaces {
    fn open(&self) {
        info!("provider selector requested");
    }
}

impl SaveAsPrompt for LoggedSurfaces {
    fn request_name(&self) {
        info!("save-as name requested");
    }
}

impl LinkOpener for LoggedSurfaces {
    fn open_external(&self, url: &str) {
        info!(%url, "external link requested");
    }
}
