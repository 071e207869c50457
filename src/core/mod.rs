//! Core functionality for sharing a directory

pub mod address;
pub mod port;
pub mod server;

// Re-export main components for convenience
pub use address::{display_remote, resolve_outbound_address};
pub use port::PortProber;
pub use server::{bind, serve, startup_banner, Bootstrap, Phase, StartupOptions};
