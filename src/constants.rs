use std::net::{IpAddr, Ipv4Addr, SocketAddr};

// Fundamental configuration constants
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DIRECTORY: &str = ".";
pub const BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

// Loopback host printed in the LOCAL startup line
pub const LOCAL_HOST: &str = "127.0.0.1";

// Never receives traffic; only used to make the OS pick a source address
pub const OUTBOUND_PROBE_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)), 80);

// Environment variables mirroring the command-line flags
pub const ENV_PORT: &str = "LAN_SERVE_PORT";
pub const ENV_DIRECTORY: &str = "LAN_SERVE_DIRECTORY";
pub const ENV_VERBOSE: &str = "LAN_SERVE_VERBOSE";
pub const ENV_NON_RECURSIVE: &str = "LAN_SERVE_NON_RECURSIVE";
pub const ENV_FALLBACK_PORT: &str = "LAN_SERVE_FALLBACK_PORT";
