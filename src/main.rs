//! Shop chat server - Entry Point

use log::{error, info};

use shop_chat_server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Loaded before the logger so RUST_LOG may live in .env
    let dotenv = dotenvy::dotenv();

    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    info!("Launching shop chat server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        error!("Server stopped with error: {}", e);
        std::process::exit(1);
    }
}
