// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity-to-card formatting.
//!
//! Pure computation: one `Activity` in, one Teams message out. Unit policy:
//! - Swim distances render in yards with a /100yd pace
//! - Run/Walk/Hike render in miles with a /mi pace
//! - Everything else renders in miles with an mph speed
//! - Elevation renders in feet
//!
//! Facts that would be zero (or divide by zero) are suppressed rather than
//! rendered.

use crate::models::{Activity, CardBuilder, Fact, SportType, TeamsMessage};

const METERS_TO_MILES: f64 = 0.000621371;
const METERS_TO_YARDS: f64 = 1.09361;
const METERS_TO_FEET: f64 = 3.28084;

/// Formats activities as Teams Adaptive Card messages.
#[derive(Debug, Clone, Copy)]
pub struct CardFormatter {
    /// Include the time of day in the card's date line.
    show_workout_time: bool,
}

impl CardFormatter {
    pub fn new(show_workout_time: bool) -> Self {
        Self { show_workout_time }
    }

    /// Build the card message for one activity.
    pub fn format(&self, activity: &Activity) -> TeamsMessage {
        let date_str = activity.start_date_local.format("%A, %B %d, %Y");
        let date_line = if self.show_workout_time {
            format!(
                "{date_str} at {}",
                activity.start_date_local.format("%-I:%M %p")
            )
        } else {
            date_str.to_string()
        };

        let mut builder = CardBuilder::new(&activity.name);
        if let Some(url) = &activity.photo_url {
            builder = builder.header_image(url);
        }
        builder = builder
            .date_line(date_line)
            .type_line(activity.sport_type.label())
            .facts(build_facts(activity));
        if let Some(description) = &activity.description {
            builder = builder.description(description);
        }
        builder.link("View on Strava", activity.url())
    }
}

/// Assemble the ordered fact list for an activity.
///
/// Order is fixed: Distance, Time, Pace/Speed, Elevation, Avg HR, Max HR,
/// Calories. Each fact appears only when its value is present and non-zero.
fn build_facts(activity: &Activity) -> Vec<Fact> {
    let mut facts = Vec::new();

    let is_swim = activity.sport_type == SportType::Swim;
    let moving_secs = activity.moving_time_secs;
    let distance_yards = activity.distance_meters * METERS_TO_YARDS;
    let distance_miles = activity.distance_meters * METERS_TO_MILES;

    if is_swim {
        if distance_yards > 0.0 {
            facts.push(Fact::new("Distance", format!("{distance_yards:.0} yd")));
        }
    } else if distance_miles > 0.0 {
        facts.push(Fact::new("Distance", format!("{distance_miles:.2} mi")));
    }

    if moving_secs > 0 {
        facts.push(Fact::new("Time", format_duration(moving_secs)));
    }

    // Pace/speed needs both distance and moving time; either being zero
    // suppresses the fact instead of dividing by zero
    if activity.distance_meters > 0.0 && moving_secs > 0 {
        if is_swim {
            let secs_per_100yd = (moving_secs as f64 / distance_yards) * 100.0;
            facts.push(Fact::new(
                "Pace",
                format!("{} /100yd", format_pace(secs_per_100yd)),
            ));
        } else if activity.sport_type.uses_pace() {
            let secs_per_mile = moving_secs as f64 / distance_miles;
            facts.push(Fact::new("Pace", format!("{} /mi", format_pace(secs_per_mile))));
        } else {
            let mph = distance_miles / (moving_secs as f64 / 3600.0);
            facts.push(Fact::new("Speed", format!("{mph:.1} mph")));
        }
    }

    let elevation_feet = activity.elevation_gain_meters * METERS_TO_FEET;
    if elevation_feet > 0.0 {
        facts.push(Fact::new("Elevation", format!("{elevation_feet:.0} ft")));
    }

    if let Some(hr) = activity.average_heartrate.filter(|hr| *hr > 0.0) {
        facts.push(Fact::new("Avg HR", format!("{hr:.0} bpm")));
    }
    if let Some(hr) = activity.max_heartrate.filter(|hr| *hr > 0.0) {
        facts.push(Fact::new("Max HR", format!("{hr:.0} bpm")));
    }
    if let Some(calories) = activity.calories.filter(|c| *c > 0.0) {
        facts.push(Fact::new("Calories", format!("{calories:.0}")));
    }

    facts
}

/// Render a duration as `HhMmSs` (hours only when non-zero).
fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

/// Render seconds-per-unit as `M:SS`, rounded to the nearest second.
fn format_pace(seconds_per_unit: f64) -> String {
    let total = seconds_per_unit.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
