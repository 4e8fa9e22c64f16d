//! Reset the marketplace tables and load the demo catalog.
//!
//! Requires `MARKETPLACE_USER_SERVICE_API` (or `USER_SERVICE_API`). Exits
//! successfully without touching the database when the operator cannot be
//! resolved from the user directory. Progress goes to stdout, logs to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use marketplace::{
    config::ConfigLoader,
    db::{init_pool, run_migrations},
    identity::UserDirectoryClient,
    seeds::{ConsoleProgress, SeedOutcome, seed_services},
    telemetry,
};

#[derive(Parser, Debug)]
#[command(
    name = "load-services",
    version,
    about = "Populate the database with sample providers, services, and options"
)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    let config = ConfigLoader::new()
        .load()
        .context("Failed to load configuration")?;
    telemetry::init_tracing_with(&config, telemetry::LogOutput::Stderr)
        .context("Failed to initialize telemetry")?;

    let directory =
        UserDirectoryClient::from_config(&config).context("Failed to build user directory client")?;

    let db = init_pool(&config).await?;
    run_migrations(&db).await?;

    let mut progress = ConsoleProgress::stdout();
    let outcome = seed_services(&db, &directory, &config.seed_operator_email, &mut progress)
        .await
        .context("Seeding failed; previous data was left unchanged")?;

    match outcome {
        SeedOutcome::Seeded(summary) => {
            tracing::info!(?summary, "Seed completed");
        }
        SeedOutcome::Aborted => {
            tracing::warn!("Seed aborted: operator could not be resolved");
        }
    }

    Ok(())
}
