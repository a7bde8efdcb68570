// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One poll cycle, end to end.
//!
//! Workflow:
//! 1. Ensure a valid access token (TokenStore)
//! 2. Fetch and hydrate activities in the lookback window
//! 3. Format each activity as an Adaptive Card
//! 4. Deliver cards to the webhook (or render them in dry-run)

use crate::config::Config;
use crate::error::Result;
use crate::services::formatter::CardFormatter;
use crate::services::strava::{ActivityFetcher, StravaClient};
use crate::services::teams::{ActivityCard, DeliveryOutcome, TeamsPoster};
use crate::services::token_store::TokenStore;

/// Counts for one completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub fetched: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Orchestrates fetch → format → deliver for one poll cycle.
pub struct ActivityPoster {
    fetcher: ActivityFetcher,
    formatter: CardFormatter,
    teams: TeamsPoster,
    lookback_hours: i64,
}

impl ActivityPoster {
    pub fn new(
        fetcher: ActivityFetcher,
        formatter: CardFormatter,
        teams: TeamsPoster,
        lookback_hours: i64,
    ) -> Self {
        Self {
            fetcher,
            formatter,
            teams,
            lookback_hours,
        }
    }

    /// Wire up all collaborators from config.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        let client = StravaClient::new(
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
            config.ssl_verify,
        )?;
        let tokens = TokenStore::new(
            config.token_file.clone(),
            config.strava_refresh_token.clone(),
        );
        let teams = TeamsPoster::new(config.teams_webhook_url.clone(), config.ssl_verify, dry_run)?;

        Ok(Self::new(
            ActivityFetcher::new(client, tokens),
            CardFormatter::new(config.show_workout_time),
            teams,
            config.lookback_hours,
        ))
    }

    /// Run one poll cycle.
    ///
    /// Auth and fetch errors propagate (the cycle is lost, the scheduler
    /// keeps future runs); delivery failures only show up in the summary.
    pub async fn run_cycle(&mut self) -> Result<CycleSummary> {
        tracing::info!(lookback_hours = self.lookback_hours, "Fetching recent activities");
        let activities = self.fetcher.list_recent(self.lookback_hours).await?;
        tracing::info!(count = activities.len(), "Found activities");

        let cards: Vec<ActivityCard> = activities
            .into_iter()
            .map(|activity| ActivityCard {
                message: self.formatter.format(&activity),
                activity,
            })
            .collect();

        let outcomes = self.teams.deliver(&cards).await;
        let sent = outcomes
            .iter()
            .filter(|o| matches!(o, DeliveryOutcome::Sent))
            .count();
        let summary = CycleSummary {
            fetched: cards.len(),
            sent,
            failed: outcomes.len() - sent,
        };

        tracing::info!(
            fetched = summary.fetched,
            sent = summary.sent,
            failed = summary.failed,
            "Cycle complete"
        );
        Ok(summary)
    }
}
