// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Severity follows the poll-cycle model: `Auth` and `StravaApi` abort the
//! current cycle (the scheduler retries at the next run), while webhook
//! delivery failures are reported per card and never surface as an
//! `AppError` at cycle level.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Webhook delivery error: {0}")]
    Delivery(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, AppError>;
