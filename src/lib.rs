#![forbid(unsafe_code)]

//! Session configuration screen of an automation-server inspector.

pub mod config;
pub mod discovery;
pub mod errors;
pub mod host;
pub mod launch;
pub mod launcher;
pub mod models;
pub mod persistence;
pub mod providers;
pub mod screen;
pub mod services;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
