//! PINFL Forge API Server
//!
//! HTTP service that generates batches of unique synthetic identity records
//! and returns them as downloadable XLSX spreadsheets.
//!
//! Usage:
//!   cargo run
//!
//! Environment:
//!   PORT / PINFL_PORT - Server port (default: 3000)
//!   PINFL_HOST        - Server host (default: 0.0.0.0)
//!   PINFL_MAX_COUNT   - Per-request row ceiling (default: 100000)
//!   PINFL_STATIC_DIR  - Frontend directory (default: static)
//!   RUST_LOG          - Log level (default: info)

use pinfl_forge::api::{create_router, handlers::AppState, start_cleanup_task};
use pinfl_forge::config::ServerConfig;
use pinfl_forge::telemetry::TelemetryCollector;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let config = ServerConfig::from_env()?;

    // Initialize telemetry
    let telemetry = Arc::new(TelemetryCollector::new());
    let telemetry_for_shutdown = telemetry.clone();

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), telemetry));

    // Start background cleanup task for rate limiter
    start_cleanup_task();
    info!("🧹 Background cleanup task started");

    // Create router
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🚀 PINFL Forge starting on http://{}", addr);
    info!("   Row ceiling per request: {}", config.max_count);
    info!("");
    info!("Endpoints:");
    info!("  GET  /generate?count=N  - Generate N unique records as XLSX");
    info!("  GET  /stats             - Generation statistics");
    info!("  GET  /health            - Health check");
    info!("  GET  /                  - Web frontend");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");
    info!("");

    // Start server with graceful shutdown
    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Graceful shutdown sequence
    info!("");
    info!("🛑 Shutdown signal received, cleaning up...");

    let stats = telemetry_for_shutdown.get_stats();
    info!("   Batches generated: {}", stats.batches_generated);
    info!("   Rows generated:    {}", stats.rows_generated);
    info!("   Rejected requests: {}", stats.rejected_requests);

    match telemetry_for_shutdown.export_stats_json() {
        Ok(path) => info!("   ✅ Stats exported to: {}", path.display()),
        Err(e) => warn!("   ⚠️ Failed to export stats: {}", e),
    }

    info!("👋 PINFL Forge shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ┌──────────────────────────────────────────────┐
    │                                              │
    │   P I N F L   F O R G E        v{}        │
    │   Synthetic identity batch generator         │
    │                                              │
    └──────────────────────────────────────────────┘
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
