//! Arcana HTTP Server Binary
//!
//! This is the main entry point for the scheduling REST API server.
//! It initializes the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) repository (default)
//! cargo run --bin arcana-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: Storage backend when no repository.toml is present (default: local)
//! - `AUTH_TOKEN`: Bearer token presented to the payment gateway (default: dev token)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use arcana_rust::db::RepositoryFactory;
use arcana_rust::external::{AutoApproveAuthorizer, StaticTokenProvider};
use arcana_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Arcana HTTP Server");

    // Prefer repository.toml when present, otherwise fall back to env
    let repository = match RepositoryFactory::from_default_config().await {
        Ok(repo) => repo,
        Err(_) => RepositoryFactory::from_env().await?,
    };
    info!("Repository initialized successfully");

    let auth = StaticTokenProvider::new(
        env::var("AUTH_TOKEN").unwrap_or_else(|_| "tok_dev_arcana".to_string()),
    );

    // Create application state
    let state = AppState::new(repository, Arc::new(auth), Arc::new(AutoApproveAuthorizer));

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
