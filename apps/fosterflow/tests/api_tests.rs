//! Integration tests for the flag API server.
//!
//! Uses axum-test to drive the router in-process.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum_test::TestServer;
use fosterflow::api::{self, ApiState};
use fosterflow_core::wire::{FetchFlagsResponse, RemoteFlagRecord};
use serde_json::{Value, json};

fn test_server() -> TestServer {
    TestServer::new(api::router(ApiState::seeded(), None)).expect("router must build")
}

fn find<'a>(flags: &'a [RemoteFlagRecord], id: &str) -> &'a RemoteFlagRecord {
    flags
        .iter()
        .find(|f| f.id == id)
        .unwrap_or_else(|| panic!("{id} missing from response"))
}

// =============================================================================
// GET TESTS
// =============================================================================

#[tokio::test]
async fn fresh_server_returns_the_five_seeded_flags() {
    let server = test_server();
    let response = server.get("/api/feature-flags").await;
    response.assert_status_ok();

    let body: FetchFlagsResponse = response.json();
    assert_eq!(body.flags.len(), 5);

    let dash = find(&body.flags, "CARERS_DASHBOARD");
    assert!(!dash.enabled);
    assert_eq!(dash.rollout_percentage, Some(20));

    let search = find(&body.flags, "ADVANCED_SEARCH");
    assert!(search.enabled);
    assert_eq!(search.rollout_percentage, None);

    let insights = find(&body.flags, "AI_INSIGHTS");
    assert!(!insights.enabled);
    assert_eq!(insights.rollout_percentage, Some(10));

    let reporting = find(&body.flags, "ENHANCED_REPORTING");
    assert!(!reporting.enabled);
    assert_eq!(reporting.rollout_percentage, Some(50));

    let automation = find(&body.flags, "WORKFLOW_AUTOMATION");
    assert!(!automation.enabled);
    assert_eq!(automation.rollout_percentage, None);
}

#[tokio::test]
async fn fetched_at_is_rfc3339() {
    let server = test_server();
    let body: Value = server.get("/api/feature-flags").await.json();
    let fetched_at = body["fetchedAt"].as_str().unwrap();
    assert!(fetched_at.parse::<chrono::DateTime<chrono::Utc>>().is_ok());
}

// =============================================================================
// PUT TESTS
// =============================================================================

#[tokio::test]
async fn put_updates_enabled_and_survives_subsequent_get() {
    let server = test_server();

    let response = server
        .put("/api/feature-flags/ADVANCED_SEARCH")
        .json(&json!({"enabled": false}))
        .await;
    response.assert_status_ok();

    let record: RemoteFlagRecord = response.json();
    assert_eq!(record.id, "ADVANCED_SEARCH");
    assert!(!record.enabled);

    let body: FetchFlagsResponse = server.get("/api/feature-flags").await.json();
    assert!(!find(&body.flags, "ADVANCED_SEARCH").enabled);
}

#[tokio::test]
async fn put_merges_only_provided_fields() {
    let server = test_server();

    // Change only the rollout percentage; enabled must stay untouched.
    let response = server
        .put("/api/feature-flags/ENHANCED_REPORTING")
        .json(&json!({"rolloutPercentage": 75}))
        .await;
    response.assert_status_ok();

    let record: RemoteFlagRecord = response.json();
    assert!(!record.enabled);
    assert_eq!(record.rollout_percentage, Some(75));

    // Now change only enabled; the percentage must stay at 75.
    let response = server
        .put("/api/feature-flags/ENHANCED_REPORTING")
        .json(&json!({"enabled": true}))
        .await;
    let record: RemoteFlagRecord = response.json();
    assert!(record.enabled);
    assert_eq!(record.rollout_percentage, Some(75));
}

#[tokio::test]
async fn put_clamps_percentage_to_100() {
    let server = test_server();
    let response = server
        .put("/api/feature-flags/AI_INSIGHTS")
        .json(&json!({"rolloutPercentage": 100}))
        .await;
    response.assert_status_ok();
    let record: RemoteFlagRecord = response.json();
    assert_eq!(record.rollout_percentage, Some(100));
}

#[tokio::test]
async fn put_unknown_id_answers_404() {
    let server = test_server();
    let response = server
        .put("/api/feature-flags/NONEXISTENT")
        .json(&json!({"enabled": true}))
        .await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["error"], "Feature flag not found");
}

#[tokio::test]
async fn empty_update_is_a_no_op() {
    let server = test_server();
    let response = server
        .put("/api/feature-flags/CARERS_DASHBOARD")
        .json(&json!({}))
        .await;
    response.assert_status_ok();

    let record: RemoteFlagRecord = response.json();
    assert!(!record.enabled);
    assert_eq!(record.rollout_percentage, Some(20));
}
