//! Request filter chain placed in front of the static file handler

pub mod logging;
pub mod non_recursive;

use std::sync::Arc;

use warp::filters::BoxedFilter;
use warp::fs::File;
use warp::Filter;

use crate::config::ServerConfig;

pub use logging::log_requests;
pub use non_recursive::reject_directories;

/// A stage of the request chain, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NonRecursive,
    Logging,
}

impl Stage {
    fn filter(self, config: Arc<ServerConfig>) -> BoxedFilter<()> {
        match self {
            Stage::NonRecursive => reject_directories(config).boxed(),
            Stage::Logging => log_requests(config).boxed(),
        }
    }
}

/// Stages enabled by this configuration, in the order requests pass them
pub fn stages(config: &ServerConfig) -> Vec<Stage> {
    let mut stages = Vec::with_capacity(2);
    if config.non_recursive {
        stages.push(Stage::NonRecursive);
    }
    stages.push(Stage::Logging);
    stages
}

/// Compose the enabled stages into one filter
pub fn request_chain(config: Arc<ServerConfig>) -> BoxedFilter<()> {
    stages(&config)
        .into_iter()
        .fold(warp::any().boxed(), |chain, stage| {
            chain.and(stage.filter(config.clone())).boxed()
        })
}

/// Full route: request chain followed by the file handler rooted at the share
pub fn routes(config: Arc<ServerConfig>) -> BoxedFilter<(File,)> {
    let files = warp::fs::dir(config.root_directory.clone());
    request_chain(config).and(files).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use warp::http::StatusCode;

    fn config(root: &Path, non_recursive: bool) -> Arc<ServerConfig> {
        Arc::new(ServerConfig::new(5000, root, false, non_recursive).unwrap())
    }

    #[test]
    fn test_stage_order() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(stages(&config(dir.path(), false)), vec![Stage::Logging]);
        assert_eq!(
            stages(&config(dir.path(), true)),
            vec![Stage::NonRecursive, Stage::Logging]
        );
    }

    #[tokio::test]
    async fn test_chain_lets_directories_through_when_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let chain = request_chain(config(dir.path(), false));

        assert!(warp::test::request().path("/sub/").matches(&chain).await);
        assert!(warp::test::request().path("/").matches(&chain).await);
    }

    #[tokio::test]
    async fn test_chain_rejects_directories_when_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let chain = request_chain(config(dir.path(), true));

        assert!(warp::test::request().path("/").matches(&chain).await);
        assert!(warp::test::request().path("/file.txt").matches(&chain).await);
        assert!(!warp::test::request().path("/sub/").matches(&chain).await);
    }

    #[tokio::test]
    async fn test_non_recursive_returns_not_found_for_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("index.html"), "<p>sub</p>").unwrap();
        let routes = routes(config(dir.path(), true));

        let res = warp::test::request().path("/sub/").reply(&routes).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_recursive_blocks_directory_without_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("index.html"), "<p>sub index</p>").unwrap();
        fs::write(dir.path().join("sub").join("page.html"), "<p>page</p>").unwrap();
        let routes = routes(config(dir.path(), true));

        let res = warp::test::request().path("/sub").reply(&routes).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = warp::test::request().path("/sub/page.html").reply(&routes).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_recursive_serves_directory_index_without_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("index.html"), "<p>sub index</p>").unwrap();
        let routes = routes(config(dir.path(), false));

        let res = warp::test::request().path("/sub").reply(&routes).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_passes_with_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<p>root</p>").unwrap();
        fs::create_dir(dir.path().join("child")).unwrap();
        let routes = routes(config(dir.path(), true));

        let res = warp::test::request().path("/").reply(&routes).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body().as_ref(), b"<p>root</p>");
    }

    #[tokio::test]
    async fn test_nested_file_is_served_with_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs").join("readme.md"), "# hello").unwrap();
        let routes = routes(config(dir.path(), true));

        let res = warp::test::request()
            .path("/docs/readme.md")
            .remote_addr("127.0.0.1:4000".parse().unwrap())
            .reply(&routes)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body().as_ref(), b"# hello");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let routes = routes(config(dir.path(), false));

        let res = warp::test::request().path("/nope.txt").reply(&routes).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
