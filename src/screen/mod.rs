//! The session-configuration screen.
//!
//! [`orchestrator::SessionConfigOrchestrator`] composes the tab controller,
//! provider registry, dirty tracker and action gateway, and runs the
//! startup sequence against the injected [`crate::services::Services`].

pub mod actions;
pub mod context;
pub mod dirty;
pub mod init;
pub mod orchestrator;
pub mod tabs;

pub use orchestrator::{ScreenSnapshot, SessionConfigOrchestrator};
