//! # Services Marketplace Main Entry Point
//!
//! This is the main entry point for the marketplace HTTP API.

use anyhow::{Context, Result};
use marketplace::{
    config::ConfigLoader,
    db::{init_pool, run_migrations},
    server::run_server,
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from layered env files and variables
    let config = ConfigLoader::new()
        .load()
        .context("Failed to load configuration")?;

    telemetry::init_tracing(&config).context("Failed to initialize telemetry")?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(configuration = %redacted_json, "Effective configuration");
    }

    let db = init_pool(&config).await?;
    run_migrations(&db).await?;

    run_server(config, db).await
}
