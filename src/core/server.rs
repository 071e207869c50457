//! Server bootstrap: port selection, address discovery, root resolution
//! and the listener itself

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::config::{local_url, resolve_root, ClientInfo, ServerConfig};
use crate::constants::{BIND_HOST, DEFAULT_PORT};
use crate::core::address::resolve_outbound_address;
use crate::core::port::PortProber;
use crate::error::{Result, ServeError};
use crate::handlers::routes;

/// Startup phases. A bootstrap moves through them one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Unconfigured,
    PortValidated,
    RootResolved,
    Listening,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Unconfigured => "unconfigured",
            Phase::PortValidated => "port validated",
            Phase::RootResolved => "root resolved",
            Phase::Listening => "listening",
        };
        f.write_str(name)
    }
}

impl Phase {
    /// The only phase reachable from this one
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Unconfigured => Some(Phase::PortValidated),
            Phase::PortValidated => Some(Phase::RootResolved),
            Phase::RootResolved => Some(Phase::Listening),
            Phase::Listening => None,
        }
    }
}

/// Raw startup settings, before anything has been checked
#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub port: u16,
    pub directory: PathBuf,
    pub verbose: bool,
    pub non_recursive: bool,
    /// Port tried when `port` is busy; `None` disables the fallback
    pub fallback_port: Option<u16>,
}

impl StartupOptions {
    pub fn new(port: u16, directory: impl Into<PathBuf>) -> Self {
        Self {
            port,
            directory: directory.into(),
            verbose: false,
            non_recursive: false,
            fallback_port: Some(DEFAULT_PORT),
        }
    }
}

/// Drives a single startup from options to a running listener
pub struct Bootstrap {
    options: StartupOptions,
    phase: Phase,
    client: Option<ClientInfo>,
}

impl Bootstrap {
    pub fn new(options: StartupOptions) -> Self {
        Self {
            options,
            phase: Phase::Unconfigured,
            client: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn check(&self, next: Phase) -> Result<()> {
        if self.phase.next() == Some(next) {
            Ok(())
        } else {
            Err(ServeError::StartupOrder(format!(
                "cannot go from {} to {}",
                self.phase, next
            )))
        }
    }

    fn advance(&mut self, next: Phase) {
        if self.options.verbose {
            info!("Startup: {} -> {}", self.phase, next);
        }
        self.phase = next;
    }

    /// Choose a free port and discover the outbound address
    pub fn validate_port(&mut self) -> Result<u16> {
        self.check(Phase::PortValidated)?;

        let prober = PortProber::new(self.options.verbose).with_fallback(self.options.fallback_port);
        let port = prober.select(self.options.port)?;
        let ip = resolve_outbound_address(self.options.verbose)?;

        self.client = Some(ClientInfo::new(ip));
        self.advance(Phase::PortValidated);
        Ok(port)
    }

    /// Resolve the shared directory to an absolute path
    pub fn resolve_root(&mut self) -> Result<PathBuf> {
        self.check(Phase::RootResolved)?;

        let root = resolve_root(&self.options.directory)?;
        if self.options.verbose {
            info!("Root directory is {}", root.display());
        }

        self.advance(Phase::RootResolved);
        Ok(root)
    }

    /// Run every startup step before the bind and return the immutable settings
    pub fn configure(&mut self) -> Result<(ServerConfig, ClientInfo)> {
        let port = self.validate_port()?;
        let root = self.resolve_root()?;
        // validate_port always sets the client info
        let client = self
            .client
            .ok_or_else(|| ServeError::AddressResolution("address not resolved".to_string()))?;

        let config = ServerConfig {
            port,
            root_directory: root,
            verbose: self.options.verbose,
            non_recursive: self.options.non_recursive,
        };

        if config.verbose {
            info!("Settings: {:?}", config);
            info!("Client info: {:?}", client);
        }
        Ok((config, client))
    }

    /// Configure and bind. The returned future serves until the process is stopped.
    pub fn listen(&mut self) -> Result<(SocketAddr, impl Future<Output = ()> + 'static)> {
        let (config, client) = self.configure()?;
        self.check(Phase::Listening)?;

        let (bound, server) = bind(config, &client)?;
        self.advance(Phase::Listening);
        Ok((bound, server))
    }

    /// Start up and serve forever
    pub async fn run(mut self) -> Result<()> {
        let (_, server) = self.listen()?;
        server.await;
        Ok(())
    }
}

/// Lines printed once the listener is up
pub fn startup_banner(port: u16, client: &ClientInfo) -> [String; 2] {
    [
        format!("   LOCAL | Navigate to: {}", local_url(port)),
        format!(" NETWORK | Navigate to: {}", client.network_url(port)),
    ]
}

/// Bind the configured port and print where the share can be reached.
///
/// The banner uses the port actually bound, which differs from the configured
/// one when that is 0.
pub fn bind(
    config: ServerConfig,
    client: &ClientInfo,
) -> Result<(SocketAddr, impl Future<Output = ()> + 'static)> {
    let config = Arc::new(config);
    let routes = routes(config.clone());
    let addr = SocketAddr::new(BIND_HOST, config.port);

    if config.verbose {
        info!("Starting server...");
    }

    let (bound, server) = warp::serve(routes)
        .try_bind_ephemeral(addr)
        .map_err(|e| ServeError::BindError(format!("{}: {}", addr, e)))?;

    if config.verbose {
        info!("Listening on {}", bound);
    }
    for line in startup_banner(bound.port(), client) {
        info!("{}", line);
    }

    Ok((bound, server))
}

/// Bind the configured port and serve until the process is stopped
pub async fn serve(config: ServerConfig, client: ClientInfo) -> Result<()> {
    let (_, server) = bind(config, &client)?;
    server.await;
    Ok(())
}
