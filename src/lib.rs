// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Teams bot: posts recent Strava activities to a Teams channel.
//!
//! Once a day (or on demand via `--test` / `--dry-run`), the bot refreshes
//! its Strava OAuth token, fetches activities from the lookback window,
//! formats each one as an Adaptive Card, and posts the cards to a Teams
//! incoming webhook.

pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod services;
