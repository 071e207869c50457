//! LAN Serve - share a local directory over HTTP
//!
//! This library provides port probing, outbound address discovery and the
//! request filter chain placed in front of a static file handler.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;

// Re-export main components
pub use config::*;
pub use constants::*;
