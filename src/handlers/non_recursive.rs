//! Non-recursive sharing
//!
//! Keeps requests for directories below the root away from the file handler.
//! A path is a directory request if it ends with a separator, or if it names a
//! directory on disk. Files in subdirectories are still reachable by their
//! full path.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use percent_encoding::percent_decode_str;
use warp::filters::path::FullPath;
use warp::{Filter, Rejection};

use crate::config::ServerConfig;
use crate::core::address::display_remote;

const ROOT_PATH: &str = "/";

/// Reject directory paths other than the root with a 404
pub fn reject_directories(
    config: Arc<ServerConfig>,
) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path::full()
        .and(warp::addr::remote())
        .and_then(move |path: FullPath, remote: Option<SocketAddr>| {
            let config = config.clone();
            async move { admit(&config, path.as_str(), remote).await }
        })
        .untuple_one()
}

/// Directory request below the root, judged by the path alone
pub fn is_blocked(path: &str) -> bool {
    path != ROOT_PATH && path.ends_with('/')
}

/// True if `path` resolves to a directory under `root` other than `root` itself
pub async fn is_subdirectory(root: &Path, path: &str) -> bool {
    match resolve_target(root, path) {
        Some(target) if target != root => tokio::fs::metadata(&target)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false),
        _ => false,
    }
}

// Mirrors how warp::fs::dir maps a request path onto the share; paths the
// file handler would refuse resolve to None.
fn resolve_target(root: &Path, path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let mut target = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.starts_with("..") || segment.contains('\\') {
            return None;
        }
        if !segment.is_empty() {
            target.push(segment);
        }
    }
    Some(target)
}

async fn admit(
    config: &ServerConfig,
    path: &str,
    remote: Option<SocketAddr>,
) -> Result<(), Rejection> {
    if !is_blocked(path) && !is_subdirectory(&config.root_directory, path).await {
        return Ok(());
    }

    if config.verbose {
        info!("{}", blocked_line(path, remote));
    }
    Err(warp::reject::not_found())
}

pub fn blocked_line(path: &str, remote: Option<SocketAddr>) -> String {
    format!(
        "Incoming request @ {} from {} DIR - BLOCKED w/ 404 response",
        path,
        display_remote(remote)
    )
}
