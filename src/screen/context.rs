//! Per-activation screen context: teardown token and re-entry guard.

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Progress of the startup sequence for one activation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum InitPhase {
    /// Not started.
    #[default]
    Idle,
    /// Sequence in flight.
    Running,
    /// Sequence finished, failed or was abandoned.
    Done,
}

/// State scoped to one activation of the screen.
///
/// Created when the screen opens; [`close`](Self::close) (or the host
/// window closing) cancels the teardown token, after which in-flight work
/// stops mutating screen state.
#[derive(Debug, Default)]
pub struct ScreenContext {
    teardown: CancellationToken,
    phase: InitPhase,
}

impl ScreenContext {
    /// Fresh context for a new activation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled when the screen is torn down.
    #[must_use]
    pub fn teardown_token(&self) -> CancellationToken {
        self.teardown.clone()
    }

    /// Whether the screen has been torn down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.teardown.is_cancelled()
    }

    /// Tear the screen down.
    pub fn close(&self) {
        debug!("screen context closed");
        self.teardown.cancel();
    }

    /// Current startup phase.
    #[must_use]
    pub fn phase(&self) -> InitPhase {
        self.phase
    }

    /// Claim the startup sequence; `false` if it already ran or is running.
    pub fn begin_init(&mut self) -> bool {
        if self.phase != InitPhase::Idle {
            return false;
        }
        self.phase = InitPhase::Running;
        true
    }

    /// Mark the startup sequence finished.
    pub fn finish_init(&mut self) {
        self.phase = InitPhase::Done;
    }
}
