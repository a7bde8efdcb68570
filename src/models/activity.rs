// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Domain model for a Strava activity as used by the card formatter.
//!
//! This is a read-only snapshot built from the detailed-activity API
//! response; nothing here is persisted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sport type of an activity.
///
/// Only the types with distinct formatting rules are enumerated; everything
/// else (e.g. "WeightTraining", "Yoga") collapses into `Other` and gets the
/// speed-based formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SportType {
    Run,
    Walk,
    Hike,
    Ride,
    Swim,
    Other(String),
}

impl SportType {
    /// Display label, as it appears on the card's type line.
    pub fn label(&self) -> &str {
        match self {
            SportType::Run => "Run",
            SportType::Walk => "Walk",
            SportType::Hike => "Hike",
            SportType::Ride => "Ride",
            SportType::Swim => "Swim",
            SportType::Other(s) => s,
        }
    }

    /// Types whose distance/time renders as a per-mile pace.
    pub fn uses_pace(&self) -> bool {
        matches!(self, SportType::Run | SportType::Walk | SportType::Hike)
    }
}

impl From<String> for SportType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Run" => SportType::Run,
            "Walk" => SportType::Walk,
            "Hike" => SportType::Hike,
            "Ride" => SportType::Ride,
            "Swim" => SportType::Swim,
            _ => SportType::Other(s),
        }
    }
}

impl From<SportType> for String {
    fn from(t: SportType) -> Self {
        t.label().to_string()
    }
}

/// One activity, fully hydrated from the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Sport type (Run, Ride, Swim, ...)
    pub sport_type: SportType,
    /// Start time in the athlete's local timezone
    pub start_date_local: NaiveDateTime,
    /// Moving time in seconds
    pub moving_time_secs: u64,
    /// Elapsed time in seconds
    pub elapsed_time_secs: u64,
    /// Distance in meters
    pub distance_meters: f64,
    /// Total elevation gain in meters
    pub elevation_gain_meters: f64,
    /// Average heart rate in bpm, if recorded
    pub average_heartrate: Option<f64>,
    /// Max heart rate in bpm, if recorded
    pub max_heartrate: Option<f64>,
    /// Calories burned, if reported
    pub calories: Option<f64>,
    /// Free-text description, if set
    pub description: Option<String>,
    /// Header photo URL, if the activity has a primary photo
    pub photo_url: Option<String>,
}

impl Activity {
    /// Canonical URL of the activity on Strava.
    pub fn url(&self) -> String {
        format!("https://www.strava.com/activities/{}", self.id)
    }
}
