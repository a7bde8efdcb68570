// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Teams bot entrypoint.
//!
//! With no flags, validates config and starts the recurring scheduler.
//! `--test` runs one poll cycle immediately in live mode; `--dry-run` runs
//! one cycle and renders cards to the console without posting.

use clap::Parser;
use strava_teams_bot::{config::Config, scheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "strava-teams-bot",
    about = "Posts recent Strava activities to a Teams channel"
)]
struct Cli {
    /// Run one poll cycle immediately and post for real
    #[arg(long)]
    test: bool,

    /// Run one poll cycle immediately, rendering cards to the console only
    #[arg(long, conflicts_with = "test")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration error");
            eprintln!("ERROR: {e}");
            eprintln!("Set STRAVA_CLIENT_ID, STRAVA_CLIENT_SECRET and TEAMS_WEBHOOK_URL (in the environment or a .env file)");
            std::process::exit(1);
        }
    };

    if cli.test || cli.dry_run {
        let mode = if cli.dry_run { "dry-run" } else { "live" };
        tracing::info!(mode, "Running single cycle");
        scheduler::run_once(&config, cli.dry_run).await?;
        return Ok(());
    }

    scheduler::run(config).await?;
    Ok(())
}

/// Initialize logging with an env-filter (RUST_LOG) and sane defaults.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_teams_bot=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
