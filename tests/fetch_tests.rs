// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity fetching tests against a mock Strava API.

use chrono::Utc;
use strava_teams_bot::error::AppError;
use strava_teams_bot::models::SportType;
use strava_teams_bot::services::{ActivityFetcher, Credentials, StravaClient, TokenStore};
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// A fetcher whose stored token expires at the given epoch second.
fn fetcher_with_expiry(
    server: &MockServer,
    dir: &tempfile::TempDir,
    expires_at: i64,
) -> ActivityFetcher {
    let token_path = dir.path().join("tokens.json");
    let creds = Credentials {
        access_token: "token".to_string(),
        refresh_token: "rt".to_string(),
        expires_at,
    };
    std::fs::write(&token_path, serde_json::to_string(&creds).unwrap()).unwrap();

    let client = StravaClient::new("id".to_string(), "secret".to_string(), true)
        .expect("client builds")
        .with_base_url(&server.uri());
    ActivityFetcher::new(client, TokenStore::new(token_path, None))
}

/// A fetcher with a valid (non-expiring) token, pointed at the mock server.
fn fetcher_for(server: &MockServer, dir: &tempfile::TempDir) -> ActivityFetcher {
    fetcher_with_expiry(server, dir, Utc::now().timestamp() + 3600)
}

/// Matches a list request whose `after` cutoff lies in the expected window.
struct AfterCutoffSince {
    earliest: i64,
    lookback_secs: i64,
}

impl wiremock::Match for AfterCutoffSince {
    fn matches(&self, request: &Request) -> bool {
        let Some(after) = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "after")
            .and_then(|(_, v)| v.parse::<i64>().ok())
        else {
            return false;
        };
        // Cutoff was computed between test start and now
        after >= self.earliest && after <= Utc::now().timestamp() - self.lookback_secs
    }
}

fn summary(id: u64, name: &str) -> serde_json::Value {
    serde_json::json!({ "id": id, "name": name })
}

fn detail(id: u64, name: &str, sport_type: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "sport_type": sport_type,
        "start_date_local": "2026-06-01T06:30:00Z",
        "moving_time": 2400,
        "elapsed_time": 2500,
        "distance": 8046.72,
        "total_elevation_gain": 12.0,
        "average_heartrate": 142.0,
        "calories": 512.0,
        "photos": { "primary": { "urls": { "600": "https://p/medium.jpg" } } }
    })
}

#[tokio::test]
async fn test_list_recent_hydrates_each_activity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            summary(101, "Morning Run"),
            summary(102, "Lunch Swim"),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail(101, "Morning Run", "Run")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/102"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail(102, "Lunch Swim", "Swim")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = fetcher_for(&server, &dir);

    let activities = fetcher.list_recent(24).await.unwrap();

    assert_eq!(activities.len(), 2);
    // Input order preserved
    assert_eq!(activities[0].id, 101);
    assert_eq!(activities[0].sport_type, SportType::Run);
    assert_eq!(activities[1].id, 102);
    assert_eq!(activities[1].sport_type, SportType::Swim);
    // Detail-only fields came through
    assert_eq!(activities[0].photo_url.as_deref(), Some("https://p/medium.jpg"));
    assert_eq!(activities[0].calories, Some(512.0));
}

#[tokio::test]
async fn test_token_expiring_mid_cycle_refreshes_before_detail_call() {
    let server = MockServer::start().await;

    // List responds slowly; by the time it returns, the token is expired
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([summary(101, "Morning Run")]))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh_token",
            "refresh_token": "fresh_rt",
            "expires_at": Utc::now().timestamp() + 21600,
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The detail endpoint only accepts the refreshed bearer; a request with
    // the stale token goes unmatched and fails the fetch
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/101"))
        .and(header("authorization", "Bearer fresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail(101, "Morning Run", "Run")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = fetcher_with_expiry(&server, &dir, Utc::now().timestamp() + 1);

    let activities = fetcher.list_recent(24).await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].id, 101);
}

#[tokio::test]
async fn test_list_cutoff_is_now_minus_lookback() {
    let earliest = Utc::now().timestamp() - 24 * 3600;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(AfterCutoffSince {
            earliest,
            lookback_secs: 24 * 3600,
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = fetcher_for(&server, &dir);

    // An `after` outside the window leaves the mock unmatched (404) and
    // fails the fetch
    let activities = fetcher.list_recent(24).await.unwrap();
    assert!(activities.is_empty());
}

#[tokio::test]
async fn test_list_pages_until_short_page() {
    let full_page: Vec<serde_json::Value> =
        (1..=100).map(|id| summary(id, "Workout")).collect();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([summary(101, "Last")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v3/activities/\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail(1, "Workout", "Run")))
        .expect(101)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = fetcher_for(&server, &dir);

    let activities = fetcher.list_recent(24).await.unwrap();
    // 100-item page forces a second fetch; the 1-item page stops the loop
    assert_eq!(activities.len(), 101);
}

#[tokio::test]
async fn test_empty_window_returns_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = fetcher_for(&server, &dir);

    let activities = fetcher.list_recent(24).await.unwrap();
    assert!(activities.is_empty());
}

#[tokio::test]
async fn test_detail_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([summary(101, "Morning Run")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/101"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = fetcher_for(&server, &dir);

    let err = fetcher.list_recent(24).await.unwrap_err();
    assert!(matches!(err, AppError::StravaApi(_)), "got {err:?}");
}

#[tokio::test]
async fn test_list_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Unauthorized"}"#))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = fetcher_for(&server, &dir);

    let err = fetcher.list_recent(24).await.unwrap_err();
    assert!(matches!(err, AppError::StravaApi(_)), "got {err:?}");
}

#[tokio::test]
async fn test_hydrate_fetches_single_activity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/777"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail(777, "Evening Ride", "Ride")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = fetcher_for(&server, &dir);

    let activity = fetcher.hydrate(777).await.unwrap();
    assert_eq!(activity.id, 777);
    assert_eq!(activity.name, "Evening Ride");
    assert_eq!(activity.sport_type, SportType::Ride);
}
