// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential persistence and refresh.
//!
//! Credentials live as the sole record of a local JSON file, written by the
//! one-time authorization flow and rewritten wholesale on every refresh.
//! The file is replaced atomically (write temp + rename) so a reader never
//! observes a torn write.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::strava::StravaClient;

/// OAuth2 credential triple, as stored in the token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry as epoch seconds
    pub expires_at: i64,
}

impl Credentials {
    /// Whether the access token is still usable at `now` (epoch seconds).
    pub fn valid_at(&self, now: i64) -> bool {
        now < self.expires_at
    }
}

/// Owns the credential file and the in-memory credential state.
///
/// There is exactly one instance per process; every refresh mutates both the
/// file and the in-memory copy before the new access token is handed out.
pub struct TokenStore {
    path: PathBuf,
    credentials: Option<Credentials>,
    /// Refresh token from config, used until the first refresh writes a file.
    fallback_refresh_token: Option<String>,
}

impl TokenStore {
    /// Load credentials from `path` if the file exists, otherwise fall back
    /// to the configured refresh token with no known expiry.
    pub fn new(path: PathBuf, fallback_refresh_token: Option<String>) -> Self {
        let credentials = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Credentials>(&raw) {
                Ok(creds) => Some(creds),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unparseable token file");
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            path,
            credentials,
            fallback_refresh_token,
        }
    }

    /// Return a valid access token, refreshing via Strava first if the
    /// cached token is expired or has unknown expiry.
    ///
    /// The new credential triple is persisted before the token is returned,
    /// so a crash after refresh never loses the rotated refresh token.
    pub async fn ensure_valid_token(&mut self, strava: &StravaClient) -> Result<String> {
        let now = Utc::now().timestamp();

        if let Some(creds) = &self.credentials {
            if creds.valid_at(now) {
                return Ok(creds.access_token.clone());
            }
        }

        let refresh_token = self
            .credentials
            .as_ref()
            .map(|c| c.refresh_token.clone())
            .or_else(|| self.fallback_refresh_token.clone())
            .ok_or_else(|| {
                AppError::Auth(
                    "No refresh token available: set STRAVA_REFRESH_TOKEN or provide a token file"
                        .to_string(),
                )
            })?;

        tracing::info!("Access token expired, refreshing");
        let response = strava
            .refresh_token(&refresh_token)
            .await
            .map_err(|e| AppError::Auth(format!("Token refresh failed: {e}")))?;

        let creds = Credentials {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: response.expires_at,
        };
        self.persist(&creds)?;

        let access_token = creds.access_token.clone();
        self.credentials = Some(creds);
        tracing::info!(path = %self.path.display(), "Token refreshed and persisted");
        Ok(access_token)
    }

    /// Atomically replace the token file with `creds`.
    fn persist(&self, creds: &Credentials) -> Result<()> {
        let json = serde_json::to_string_pretty(creds)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Serializing credentials: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Current in-memory credentials, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}
