//! # Source Update API
//!
//! Binary entry point. Configuration comes from `WL_API_CONFIG` (optional JSON
//! file) and the process environment; see `domain::config::env`.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wl_source_api::{ServiceConfig, SourceUpdateServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServiceConfig::load().context("failed to load configuration")?;
    let server = SourceUpdateServer::from_config(config).context("failed to start service")?;

    // Without an external queue, log commands from the in-process bus so
    // publishes are acknowledged and visible.
    if let Some(bus) = server.command_bus() {
        warn!("No queue URL configured; update commands are only logged");
        let mut commands = bus.subscribe();
        tokio::spawn(async move {
            while let Some(envelope) = commands.recv().await {
                info!(
                    message_id = %envelope.message_id,
                    queue = %envelope.queue,
                    source_id = %envelope.command.id,
                    force = envelope.command.force,
                    "Update command received"
                );
            }
        });
    }

    server.run().await?;
    Ok(())
}
