use env_logger::Env;
use log::{debug, error, info};

use lan_serve::cli::Args;
use lan_serve::core::server::Bootstrap;

#[tokio::main]
async fn main() {
    // Load .env first so it can set RUST_LOG
    let dotenv = dotenvy::dotenv();

    // Initialize logging; RUST_LOG overrides the default level
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match dotenv {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    let args = Args::parse_normalized(std::env::args_os());

    if let Err(e) = Bootstrap::new(args.into_options()).run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
