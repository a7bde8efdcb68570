// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod card;

pub use activity::{Activity, SportType};
pub use card::{CardBuilder, Fact, TeamsMessage};
