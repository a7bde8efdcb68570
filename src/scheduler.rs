// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily schedule loop.
//!
//! Sleeps until the next configured HH:MM in the configured timezone, runs
//! one poll cycle, and repeats. A failed cycle is logged and the next run
//! stays scheduled. Ctrl-C terminates the loop between cycles; there is no
//! mid-cycle cancellation.
//!
//! Cycles are awaited to completion before the next occurrence is computed,
//! so runs never overlap within one process.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::Config;
use crate::error::Result;
use crate::services::ActivityPoster;

/// Run the recurring scheduler until interrupted.
pub async fn run(config: Config) -> Result<()> {
    tracing::info!(
        timezone = %config.timezone,
        schedule = %format!("{:02}:{:02}", config.schedule_hour, config.schedule_minute),
        lookback_hours = config.lookback_hours,
        "Scheduler started"
    );

    loop {
        let now = Utc::now().with_timezone(&config.timezone);
        let next = next_occurrence(now, config.schedule_hour, config.schedule_minute);
        tracing::info!(next_run = %next, "Sleeping until next scheduled run");

        let wait = (next.with_timezone(&Utc) - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, shutting down");
                return Ok(());
            }
        }

        if let Err(e) = run_once(&config, false).await {
            // Cycle lost; the next scheduled run stays on the calendar
            tracing::error!(error = %e, "Poll cycle failed");
        }
    }
}

/// Run a single poll cycle (also the `--test` / `--dry-run` entrypoint).
pub async fn run_once(config: &Config, dry_run: bool) -> Result<()> {
    let mut poster = ActivityPoster::from_config(config, dry_run)?;
    poster.run_cycle().await?;
    Ok(())
}

/// First wall-clock occurrence of `hour:minute` strictly after `now`.
///
/// A DST gap that swallows the scheduled time resolves to the shifted
/// instant where possible, otherwise the day is skipped.
fn next_occurrence(now: DateTime<Tz>, hour: u32, minute: u32) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut date = now.date_naive();
    loop {
        if let Some(naive) = date.and_hms_opt(hour, minute, 0) {
            if let Some(candidate) = tz.from_local_datetime(&naive).earliest() {
                if candidate > now {
                    return candidate;
                }
            }
        }
        date = date.succ_opt().expect("calendar overflow");
    }
}
