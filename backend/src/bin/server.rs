//! Airops HTTP Server Binary
//!
//! This is the main entry point for the flight analytics REST API server.
//! It loads the flight table, builds the analytics service, sets up the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with ./airops.toml (or built-in defaults)
//! cargo run --bin airops-server
//!
//! # Run with an explicit configuration file
//! AIROPS_CONFIG=/etc/airops.toml cargo run --bin airops-server
//! ```
//!
//! # Environment Variables
//!
//! - `AIROPS_CONFIG`: Path to the TOML configuration file
//! - `HOST`: Server host (overrides `server.host`)
//! - `PORT`: Server port (overrides `server.port`)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use airops::config::AppConfig;
use airops::http::{create_router, AppState};
use airops::loader;
use airops::services::AnalyticsService;

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

    info!("Starting Airops HTTP Server");

    let config = AppConfig::load()?;

    let started = Instant::now();
    let data = config.data.clone();
    let store = tokio::task::spawn_blocking(move || loader::load_store(&data)).await??;
    info!(
        "Loaded {} flight records in {:?}",
        store.len(),
        started.elapsed()
    );

    // Create application state
    let service = Arc::new(AnalyticsService::from_config(Arc::new(store), &config));
    let state = AppState::from_config(service, &config);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
