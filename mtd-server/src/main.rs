//! Mission Telemetry Server
//!
//! Runs the tick and poll drivers and serves the JSON control API

use anyhow::Result;
use mtd_server::{api, config, manager, state};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Mission Telemetry Server");

    let settings = config::load_settings()?;
    info!(
        "Initial source: {}, polling every {:?}",
        settings.initial_source,
        settings.poll_interval()
    );

    // Create application state
    let state = state::AppState::new(&settings)?;

    // Build the router
    let app = api::create_router(state.clone());

    // Start drivers in background
    let shutdown = CancellationToken::new();
    let (ticker, poller) = manager::spawn(
        state,
        settings.tick_interval(),
        settings.poll_interval(),
        shutdown.clone(),
    );

    // Start server
    info!("Server listening on http://{}", settings.bind_addr);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    ticker.await?;
    poller.await?;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler only the token can stop the server
        error!("Failed to listen for Ctrl-C: {}", e);
        shutdown.cancelled().await;
        return;
    }
    info!("Ctrl-C received, shutting down");
    shutdown.cancel();
}
