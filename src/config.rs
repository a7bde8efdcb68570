// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development. Strava API credentials
//! and the Teams webhook URL are required; everything else has a default.

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Refresh token used when no credentials file exists yet
    pub strava_refresh_token: Option<String>,
    /// Teams incoming-webhook URL
    pub teams_webhook_url: String,
    /// IANA timezone the schedule is evaluated in
    pub timezone: Tz,
    /// Hour of day (0-23) for the scheduled post
    pub schedule_hour: u32,
    /// Minute (0-59) for the scheduled post
    pub schedule_minute: u32,
    /// How far back to look for new activities
    pub lookback_hours: i64,
    /// Verify TLS certificates on outbound calls.
    /// Disabled only for corporate MITM proxies.
    pub ssl_verify: bool,
    /// Include the time of day in the card's date line
    pub show_workout_time: bool,
    /// Where OAuth credentials are persisted
    pub token_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let timezone_name =
            env::var("TIMEZONE").unwrap_or_else(|_| "America/New_York".to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| ConfigError::Invalid("TIMEZONE", timezone_name.clone()))?;

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_refresh_token: env::var("STRAVA_REFRESH_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            teams_webhook_url: env::var("TEAMS_WEBHOOK_URL")
                .map_err(|_| ConfigError::Missing("TEAMS_WEBHOOK_URL"))?,
            timezone,
            schedule_hour: parse_env_or("SCHEDULE_HOUR", 9, |h| *h < 24)?,
            schedule_minute: parse_env_or("SCHEDULE_MINUTE", 0, |m| *m < 60)?,
            lookback_hours: parse_env_or("LOOKBACK_HOURS", 24, |h| *h > 0)?,
            ssl_verify: env::var("SSL_VERIFY")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            show_workout_time: env::var("SHOW_WORKOUT_TIME")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            token_file: env::var("TOKEN_FILE")
                .unwrap_or_else(|_| "tokens.json".to_string())
                .into(),
        })
    }
}

/// Parse an env var with a default and a validity check.
fn parse_env_or<T>(
    name: &'static str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse::<T>()
            .ok()
            .filter(|v| valid(v))
            .ok_or(ConfigError::Invalid(name, raw)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
