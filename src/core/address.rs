//! Address utilities
//!
//! Discovers the address LAN peers can reach this host on, and renders
//! request peer addresses for the log.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use log::info;

use crate::constants::OUTBOUND_PROBE_ADDR;
use crate::error::{Result, ServeError};

/// Find the local address the OS would use for outbound traffic
pub fn resolve_outbound_address(verbose: bool) -> Result<IpAddr> {
    if verbose {
        info!("Querying local outbound IP address");
    }

    let ip = resolve_outbound_address_via(OUTBOUND_PROBE_ADDR)?;

    if verbose {
        info!("Local outbound IP address is {}", ip);
    }
    Ok(ip)
}

/// Same as [`resolve_outbound_address`] against an arbitrary target.
///
/// UDP connect only sets the default peer, so no packet is sent. The socket is
/// closed when it goes out of scope.
pub fn resolve_outbound_address_via(target: SocketAddr) -> Result<IpAddr> {
    let unspecified: IpAddr = match target {
        SocketAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
        SocketAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
    };

    let socket = UdpSocket::bind(SocketAddr::new(unspecified, 0))
        .map_err(|e| ServeError::AddressResolution(format!("bind failed: {}", e)))?;
    socket
        .connect(target)
        .map_err(|e| ServeError::AddressResolution(format!("no route to {}: {}", target, e)))?;
    let local = socket
        .local_addr()
        .map_err(|e| ServeError::AddressResolution(e.to_string()))?;

    if local.ip().is_unspecified() {
        return Err(ServeError::AddressResolution(
            "OS did not assign a source address".to_string(),
        ));
    }

    Ok(local.ip())
}

/// Render a peer address for request logs.
///
/// Loopback peers show as `localhost:<port>` instead of `127.0.0.1` or `[::1]`.
pub fn display_remote(remote: Option<SocketAddr>) -> String {
    match remote {
        Some(addr) if is_loopback(addr.ip()) => format!("localhost:{}", addr.port()),
        Some(addr) => addr.to_string(),
        None => "unknown".to_string(),
    }
}

fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => ipv4.is_loopback(),
        IpAddr::V6(ipv6) => {
            ipv6.is_loopback() || ipv6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
        }
    }
}
