//! Port availability probing with fallback to the default port

use std::net::{SocketAddr, TcpListener};

use log::info;

use crate::constants::{BIND_HOST, DEFAULT_PORT};
use crate::error::{Result, ServeError};

/// Checks ports by binding and immediately releasing them
#[derive(Debug, Clone)]
pub struct PortProber {
    verbose: bool,
    fallback_port: Option<u16>,
}

impl PortProber {
    /// Create a prober that falls back to the default port
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            fallback_port: Some(DEFAULT_PORT),
        }
    }

    /// Use a different fallback port, or none at all
    pub fn with_fallback(mut self, fallback_port: Option<u16>) -> Self {
        self.fallback_port = fallback_port;
        self
    }

    pub fn fallback_port(&self) -> Option<u16> {
        self.fallback_port
    }

    /// Return true if a listener could bind `port` right now.
    ///
    /// The probe listener is dropped before returning, so the port is free
    /// again for the real server.
    pub fn is_available(&self, port: u16) -> bool {
        if self.verbose {
            info!("Checking if port {} is available...", port);
        }

        let available = match TcpListener::bind(SocketAddr::new(BIND_HOST, port)) {
            Ok(listener) => {
                drop(listener);
                true
            }
            Err(_) => false,
        };

        if self.verbose {
            if available {
                info!("Port {} is available", port);
            } else {
                info!("Port {} is not available", port);
            }
        }

        available
    }

    /// Pick the port the server should listen on.
    ///
    /// The requested port wins when free. Otherwise the fallback port is tried,
    /// unless there is none or it is the port that just failed.
    pub fn select(&self, requested: u16) -> Result<u16> {
        if self.is_available(requested) {
            return Ok(requested);
        }

        let fallback = match self.fallback_port {
            Some(fallback) if fallback != requested => fallback,
            _ => return Err(ServeError::PortUnavailable(requested)),
        };

        info!(
            "Port {} is not able to be listened on, trying port {}",
            requested, fallback
        );

        if self.is_available(fallback) {
            Ok(fallback)
        } else {
            Err(ServeError::NoViablePort {
                requested,
                fallback,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupy() -> (TcpListener, u16) {
        let listener = TcpListener::bind(SocketAddr::new(BIND_HOST, 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[test]
    fn test_busy_port_is_unavailable_until_released() {
        let prober = PortProber::new(false);
        let (listener, port) = occupy();

        assert!(!prober.is_available(port));
        drop(listener);
        assert!(prober.is_available(port));
    }

    #[test]
    fn test_probe_does_not_hold_port() {
        let prober = PortProber::new(true);
        let (listener, port) = occupy();
        drop(listener);

        assert!(prober.is_available(port));
        assert!(prober.is_available(port));
        assert!(TcpListener::bind(SocketAddr::new(BIND_HOST, port)).is_ok());
    }

    #[test]
    fn test_select_keeps_free_requested_port() {
        let (listener, port) = occupy();
        drop(listener);

        let prober = PortProber::new(false).with_fallback(None);
        assert_eq!(prober.select(port).unwrap(), port);
    }

    #[test]
    fn test_select_falls_back_when_requested_is_busy() {
        let (_busy, requested) = occupy();
        let (fallback_listener, fallback) = occupy();
        drop(fallback_listener);

        let prober = PortProber::new(false).with_fallback(Some(fallback));
        assert_eq!(prober.select(requested).unwrap(), fallback);
    }

    #[test]
    fn test_select_fails_when_busy_port_is_the_fallback() {
        let (_busy, port) = occupy();

        let prober = PortProber::new(false).with_fallback(Some(port));
        assert!(matches!(
            prober.select(port),
            Err(ServeError::PortUnavailable(p)) if p == port
        ));
    }

    #[test]
    fn test_select_fails_when_both_ports_are_busy() {
        let (_busy, requested) = occupy();
        let (_also_busy, fallback) = occupy();

        let prober = PortProber::new(false).with_fallback(Some(fallback));
        assert!(matches!(
            prober.select(requested),
            Err(ServeError::NoViablePort { .. })
        ));
    }

    #[test]
    fn test_select_without_fallback_is_fatal() {
        let (_busy, port) = occupy();

        let prober = PortProber::new(false).with_fallback(None);
        assert!(prober.select(port).is_err());
    }
}
