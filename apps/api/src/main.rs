//! # Pitstop API
//!
//! HTTP server for the garage maintenance-booking backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Pitstop API Server                             │
//! │                                                                         │
//! │  Client ───► HTTP (3000) ───► routes ───► pitstop-core ───► verdict    │
//! │                                  │        (admission, reports)          │
//! │                                  ▼                                      │
//! │                              pitstop-db ───► SQLite                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod locks;
mod routes;
mod state;

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use pitstop_db::{Database, DbConfig};

use crate::config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides the default filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Pitstop API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.port,
        database_path = %config.database_path,
        serialize_admissions = config.serialize_admissions,
        "Configuration loaded"
    );

    // Connect to SQLite (migrations run on connect)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Connected to SQLite, migrations complete");

    // Create shared state and the router
    let state = AppState::new(db, config.serialize_admissions);
    let app = routes::build_router(state);

    // Start server
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
