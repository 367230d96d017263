//! Domain model module declarations.

pub mod caps;
pub mod patch;
pub mod running;
pub mod saved;
pub mod server;
pub mod tabs;
