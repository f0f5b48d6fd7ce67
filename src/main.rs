//! Orb Arena Server
//!
//! Loads the card catalog, starts the arena and serves WebSocket clients
//! until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use orb_arena::{GameServer, ServerConfig, TICK_RATE, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Orb Arena Server v{}", VERSION);

    let config = ServerConfig::from_env().context("Invalid configuration")?;
    info!(
        "Tick Rate: {} Hz (default {}), broadcast {} Hz, world {}",
        config.tick_rate, TICK_RATE, config.broadcast_rate, config.world_size
    );

    let server = GameServer::from_config(config.clone()).with_context(|| {
        format!("Failed to load card catalog from {}", config.catalog_path.display())
    })?;
    let server = Arc::new(server);

    let signal_server = Arc::clone(&server);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, shutting down");
                signal_server.shutdown();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    server.run().await?;
    info!("Server stopped");
    Ok(())
}
