// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Teams webhook delivery.
//!
//! Cards are posted one at a time, in input order. A failed POST is reported
//! per card and never aborts the rest of the batch; there is no retry.
//! In dry-run mode cards are rendered to stdout and nothing touches the
//! network.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{Activity, TeamsMessage};

/// Explicit timeout on webhook POSTs; reqwest has none by default.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One formatted card paired with the activity it came from.
#[derive(Debug, Clone)]
pub struct ActivityCard {
    pub activity: Activity,
    pub message: TeamsMessage,
}

/// Per-card delivery result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
}

/// Posts activity cards to a Teams incoming webhook.
pub struct TeamsPoster {
    http: reqwest::Client,
    webhook_url: String,
    dry_run: bool,
}

impl TeamsPoster {
    pub fn new(webhook_url: String, verify_tls: bool, dry_run: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Building HTTP client: {e}")))?;

        Ok(Self {
            http,
            webhook_url,
            dry_run,
        })
    }

    /// Deliver each card, returning one outcome per card in input order.
    ///
    /// An empty batch is a logged no-op, not an error.
    pub async fn deliver(&self, cards: &[ActivityCard]) -> Vec<DeliveryOutcome> {
        if cards.is_empty() {
            tracing::info!("No activities in the lookback window, nothing to post");
            return Vec::new();
        }

        let mut outcomes = Vec::with_capacity(cards.len());
        for card in cards {
            let outcome = if self.dry_run {
                self.render(card);
                DeliveryOutcome::Sent
            } else {
                match self.post(card).await {
                    Ok(()) => {
                        tracing::info!(activity = %card.activity.name, "Posted activity card");
                        DeliveryOutcome::Sent
                    }
                    Err(e) => {
                        tracing::warn!(activity = %card.activity.name, error = %e, "Delivery failed");
                        DeliveryOutcome::Failed(e.to_string())
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// POST one card to the webhook. 200/202 is success; any other status or
    /// transport failure is a `Delivery` error.
    async fn post(&self, card: &ActivityCard) -> Result<()> {
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&card.message)
            .send()
            .await
            .map_err(|e| AppError::Delivery(e.to_string()))?;

        if matches!(response.status().as_u16(), 200 | 202) {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Delivery(format!("HTTP {status}: {body}")))
    }

    /// Render one card to the console instead of posting it.
    fn render(&self, card: &ActivityCard) {
        let activity = &card.activity;
        println!("\n{}", "=".repeat(60));
        println!("ACTIVITY: {}", activity.name);
        println!("{}", "=".repeat(60));
        println!("Type: {}", activity.sport_type.label());
        println!("Date: {}", activity.start_date_local);
        match serde_json::to_string_pretty(&card.message) {
            Ok(json) => println!("\nCard JSON:\n{json}"),
            Err(e) => tracing::warn!(error = %e, "Failed to render card JSON"),
        }
        println!("{}\n", "=".repeat(60));
    }
}
