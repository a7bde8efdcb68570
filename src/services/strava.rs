// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client and recent-activity fetcher.
//!
//! Handles:
//! - Refresh-token grant against the Strava OAuth endpoint
//! - Paginated activity listing since a cutoff timestamp
//! - Per-activity detail fetch (list responses omit photos)

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Activity, SportType};
use crate::services::token_store::TokenStore;

const DEFAULT_API_BASE: &str = "https://www.strava.com/api/v3";
const DEFAULT_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// Explicit timeout on every outbound call; reqwest has none by default.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size for the activity list endpoint.
const LIST_PAGE_SIZE: u32 = 100;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_base: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    ///
    /// `verify_tls = false` accepts invalid certificates on this client only
    /// (for corporate MITM proxies); nothing is patched process-wide.
    pub fn new(client_id: String, client_secret: String, verify_tls: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Building HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id,
            client_secret,
        })
    }

    /// Point the client at a different server. Used by tests.
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.api_base = format!("{base}/api/v3");
        self.token_url = format!("{base}/oauth/token");
        self
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefreshResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {e}")))?;

        check_response_json(response).await
    }

    /// List activity summaries started after `after` (Unix timestamp).
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<SummaryActivity>> {
        let url = format!("{}/athlete/activities", self.api_base);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", after.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        check_response_json(response).await
    }

    /// Get a detailed activity by ID (includes photos and calories).
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<DetailedActivity> {
        let url = format!("{}/activities/{}", self.api_base, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        check_response_json(response).await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
        }

        return Err(AppError::StravaApi(format!("HTTP {status}: {body}")));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::StravaApi(format!("JSON parse error: {e}")))
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Summary activity from the list endpoint. Only the ID is consumed; the
/// detail fetch supplies everything else.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryActivity {
    pub id: u64,
    pub name: String,
}

/// Detailed activity response.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailedActivity {
    pub id: u64,
    pub name: String,
    pub sport_type: String,
    /// Wall-clock start time in the athlete's timezone, RFC3339 with a
    /// bogus `Z` suffix (Strava quirk)
    pub start_date_local: String,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Elapsed time in seconds
    pub elapsed_time: u64,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    pub calories: Option<f64>,
    pub description: Option<String>,
    pub photos: Option<ActivityPhotos>,
}

/// Photo attachments on a detailed activity.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityPhotos {
    pub primary: Option<PrimaryPhoto>,
}

/// The activity's primary photo, keyed by resolution ("600", "1000").
#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryPhoto {
    #[serde(default)]
    pub urls: HashMap<String, String>,
}

impl DetailedActivity {
    /// Convert the wire representation into the domain snapshot.
    pub fn into_activity(self) -> Result<Activity> {
        let start_date_local = chrono::DateTime::parse_from_rfc3339(&self.start_date_local)
            .map(|dt| dt.naive_local())
            .map_err(|e| {
                AppError::StravaApi(format!(
                    "Invalid start_date_local for activity {}: {e}",
                    self.id
                ))
            })?;

        // Medium resolution preferred, large as fallback, no third option
        let photo_url = self.photos.as_ref().and_then(|p| {
            let urls = &p.primary.as_ref()?.urls;
            urls.get("600").or_else(|| urls.get("1000")).cloned()
        });

        Ok(Activity {
            id: self.id,
            name: self.name,
            sport_type: SportType::from(self.sport_type),
            start_date_local,
            moving_time_secs: self.moving_time,
            elapsed_time_secs: self.elapsed_time,
            distance_meters: self.distance,
            elevation_gain_meters: self.total_elevation_gain,
            average_heartrate: self.average_heartrate,
            max_heartrate: self.max_heartrate,
            calories: self.calories,
            description: self.description.filter(|d| !d.trim().is_empty()),
            photo_url,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ActivityFetcher - lookback window + detail hydration
// ─────────────────────────────────────────────────────────────────────────────

/// Fetches recent activities, fully hydrated with detail data.
///
/// Each poll issues one list call plus one detail call per activity; list
/// responses omit photo attachments, so the detail fetch is unavoidable.
/// N is daily personal activity volume, so the extra calls are cheap.
pub struct ActivityFetcher {
    client: StravaClient,
    tokens: TokenStore,
}

impl ActivityFetcher {
    pub fn new(client: StravaClient, tokens: TokenStore) -> Self {
        Self { client, tokens }
    }

    /// Fetch all activities started within the last `lookback_hours`,
    /// in the order the API returns them (oldest first).
    ///
    /// Token expiry is re-checked before every call (a no-op while the
    /// token is valid), so a token expiring mid-cycle refreshes instead of
    /// failing the remaining calls. Any detail-fetch failure propagates; a
    /// cycle never posts a partially hydrated batch.
    pub async fn list_recent(&mut self, lookback_hours: i64) -> Result<Vec<Activity>> {
        let after = (Utc::now() - chrono::Duration::hours(lookback_hours)).timestamp();

        let mut summaries = Vec::new();
        let mut page = 1;
        loop {
            let token = self.tokens.ensure_valid_token(&self.client).await?;
            let batch = self
                .client
                .list_activities(&token, after, page, LIST_PAGE_SIZE)
                .await?;
            let done = (batch.len() as u32) < LIST_PAGE_SIZE;
            summaries.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        tracing::info!(
            count = summaries.len(),
            lookback_hours,
            "Fetched activity summaries"
        );

        let mut activities = Vec::with_capacity(summaries.len());
        for summary in summaries {
            tracing::debug!(activity_id = summary.id, name = %summary.name, "Hydrating activity");
            activities.push(self.hydrate(summary.id).await?);
        }
        Ok(activities)
    }

    /// Fetch one activity with full detail (including photos).
    pub async fn hydrate(&mut self, activity_id: u64) -> Result<Activity> {
        let token = self.tokens.ensure_valid_token(&self.client).await?;
        self.client
            .get_activity(&token, activity_id)
            .await?
            .into_activity()
    }
}
