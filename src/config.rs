//! Server configuration module
//! Holds the immutable settings fixed before the listener starts

use crate::constants::LOCAL_HOST;
use crate::error::{Result, ServeError};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Server configuration parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Absolute, filesystem-resolved directory being shared
    pub root_directory: PathBuf,
    /// Enable diagnostic logging
    pub verbose: bool,
    /// Reject directory requests below the root
    pub non_recursive: bool,
}

impl ServerConfig {
    /// Create a configuration from an already resolved port and directory.
    ///
    /// The directory is resolved again so a relative path can never reach the
    /// file handler.
    pub fn new(port: u16, directory: &Path, verbose: bool, non_recursive: bool) -> Result<Self> {
        Ok(Self {
            port,
            root_directory: resolve_root(directory)?,
            verbose,
            non_recursive,
        })
    }
}

/// URL printed for access from this machine
pub fn local_url(port: u16) -> String {
    format!("{}:{}", LOCAL_HOST, port)
}

/// Information about this host as seen by LAN peers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientInfo {
    pub local_outbound_ip: IpAddr,
}

impl ClientInfo {
    pub fn new(local_outbound_ip: IpAddr) -> Self {
        Self { local_outbound_ip }
    }

    /// URL printed for access from other devices on the network
    pub fn network_url(&self, port: u16) -> String {
        match self.local_outbound_ip {
            IpAddr::V4(ip) => format!("{}:{}", ip, port),
            IpAddr::V6(ip) => format!("[{}]:{}", ip, port),
        }
    }
}

/// Resolve the directory argument to an absolute path.
///
/// Fails if the path does not exist or is not a directory.
pub fn resolve_root(directory: &Path) -> Result<PathBuf> {
    let root = directory.canonicalize().map_err(|e| {
        ServeError::InvalidDirectory(format!(
            "cannot resolve '{}': {}",
            directory.display(),
            e
        ))
    })?;

    if !root.is_dir() {
        return Err(ServeError::InvalidDirectory(format!(
            "'{}' is not a directory",
            root.display()
        )));
    }

    Ok(root)
}
