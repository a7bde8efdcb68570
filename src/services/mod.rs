// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod formatter;
pub mod poster;
pub mod strava;
pub mod teams;
pub mod token_store;

pub use formatter::CardFormatter;
pub use poster::{ActivityPoster, CycleSummary};
pub use strava::{ActivityFetcher, StravaClient};
pub use teams::{ActivityCard, DeliveryOutcome, TeamsPoster};
pub use token_store::{Credentials, TokenStore};
