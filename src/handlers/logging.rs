use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use log::info;
use warp::filters::path::FullPath;
use warp::Filter;

use crate::config::ServerConfig;
use crate::core::address::display_remote;

/// Log every request that reaches this stage, then forward it unchanged
pub fn log_requests(
    config: Arc<ServerConfig>,
) -> impl Filter<Extract = (), Error = Infallible> + Clone {
    warp::path::full()
        .and(warp::addr::remote())
        .map(move |path: FullPath, remote: Option<SocketAddr>| {
            if config.verbose {
                info!("{}", request_line(path.as_str(), remote));
            }
        })
        .untuple_one()
}

pub fn request_line(path: &str, remote: Option<SocketAddr>) -> String {
    format!("Incoming request @ {} from {}", path, display_remote(remote))
}
