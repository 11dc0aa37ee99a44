//! Public profile resolution and visitor analytics.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use taponn_client::ProfileError;
use taponn_client::navigation::NOT_FOUND_PATH;
use taponn_integration_tests::{TestClient, profile_json};

#[tokio::test]
async fn test_profile_found_records_view() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::GET,
        "/profiles/public/asha",
        StatusCode::OK,
        json!({"success": true, "data": profile_json("asha")}),
    );

    let view = client
        .services
        .profiles
        .open("asha")
        .await
        .expect("profile should resolve");
    assert_eq!(view.profile().display_name, "Asha Rao");
    client.services.tracker.flush().await;

    let events = client
        .backend
        .requests_to(&Method::POST, "/analytics/event");
    assert_eq!(events.len(), 1);
    let event = events[0].json();
    assert_eq!(event["eventType"], "profile_view");
    assert_eq!(event["eventAction"], "view");
    assert_eq!(event["profile"], "6660a1b2c3d4e5f601234567");
    assert_eq!(event["user"], "665f1c2e9b1e8a0012345678");
    assert_eq!(event["metadata"]["sessionId"], view.session_id().as_str());
    assert_eq!(event["metadata"]["source"], "direct_visit");
    assert_ne!(client.current_path(), NOT_FOUND_PATH);
}

#[tokio::test]
async fn test_missing_profile_redirects_to_not_found() {
    let client = TestClient::start().await;

    let err = client.services.profiles.open("ghost").await.unwrap_err();

    assert!(matches!(err, ProfileError::NotFound(ref u) if u == "ghost"));
    assert_eq!(client.current_path(), NOT_FOUND_PATH);
    client.services.tracker.flush().await;
    assert!(
        client
            .backend
            .requests_to(&Method::POST, "/analytics/event")
            .is_empty()
    );
}

#[tokio::test]
async fn test_unsuccessful_envelope_redirects_to_not_found() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::GET,
        "/profiles/public/paused",
        StatusCode::OK,
        json!({"success": false, "message": "Profile is inactive"}),
    );

    assert!(client.services.profiles.open("paused").await.is_err());
    assert_eq!(client.current_path(), NOT_FOUND_PATH);
}

#[tokio::test]
async fn test_server_error_redirects_to_not_found() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::GET,
        "/profiles/public/asha",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"success": false, "message": "Database unavailable"}),
    );

    assert!(client.services.profiles.open("asha").await.is_err());
    assert_eq!(client.current_path(), NOT_FOUND_PATH);
}

#[tokio::test]
async fn test_blank_username_never_hits_backend() {
    let client = TestClient::start().await;

    assert!(client.services.profiles.open("  / ").await.is_err());

    assert_eq!(client.current_path(), NOT_FOUND_PATH);
    assert!(client.backend.requests().is_empty());
}

#[tokio::test]
async fn test_link_clicks_share_the_view_session() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::GET,
        "/profiles/public/asha",
        StatusCode::OK,
        json!({"success": true, "data": profile_json("asha")}),
    );

    let view = client.services.profiles.open("asha").await.unwrap();
    let links = view.links();
    let linkedin = links.iter().find(|l| l.kind() == "linkedin").unwrap();
    let upi = links.iter().find(|l| l.kind() == "upi").unwrap();

    assert_eq!(
        view.click(linkedin).as_deref(),
        Some("https://linkedin.com/in/asharao")
    );
    let upi_href = view.click(upi).unwrap();
    assert!(upi_href.starts_with("upi://pay?pa=asha@okaxis"));
    client.services.tracker.flush().await;

    let events: Vec<_> = client
        .backend
        .requests_to(&Method::POST, "/analytics/event")
        .iter()
        .map(taponn_integration_tests::RecordedRequest::json)
        .collect();
    assert_eq!(events.len(), 3);

    let session = view.session_id().as_str();
    assert!(events.iter().all(|e| e["metadata"]["sessionId"] == session));

    let social = events
        .iter()
        .find(|e| e["eventType"] == "social_link_click")
        .unwrap();
    assert_eq!(social["eventAction"], "linkedin");
    assert_eq!(social["metadata"]["platform"], "linkedin");

    let contact = events
        .iter()
        .find(|e| e["eventType"] == "contact_click")
        .unwrap();
    assert_eq!(contact["eventAction"], "upi");
    assert_eq!(contact["metadata"]["value"], "asha@okaxis");
}

#[tokio::test]
async fn test_blank_social_links_are_not_offered() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::GET,
        "/profiles/public/asha",
        StatusCode::OK,
        json!({"success": true, "data": profile_json("asha")}),
    );

    let view = client.services.profiles.open("asha").await.unwrap();

    assert!(view.links().iter().all(|l| l.kind() != "twitter"));
}

#[tokio::test]
async fn test_analytics_failure_does_not_block_profile() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::GET,
        "/profiles/public/asha",
        StatusCode::OK,
        json!({"success": true, "data": profile_json("asha")}),
    );
    client.backend.respond(
        Method::POST,
        "/analytics/event",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"success": false, "message": "Analytics store down"}),
    );

    let view = client.services.profiles.open("asha").await.unwrap();
    let website = view
        .links()
        .into_iter()
        .find(|l| l.kind() == "website")
        .unwrap();

    assert_eq!(view.click(&website).as_deref(), Some("https://asha.design"));
    client.services.tracker.flush().await;
    assert_eq!(client.services.tracker.pending(), 0);
    assert_ne!(client.current_path(), NOT_FOUND_PATH);
}

#[tokio::test]
async fn test_session_id_survives_across_profiles() {
    let client = TestClient::start().await;
    for name in ["asha", "ravi"] {
        client.backend.respond(
            Method::GET,
            &format!("/profiles/public/{name}"),
            StatusCode::OK,
            json!({"success": true, "data": profile_json(name)}),
        );
    }

    let first = client.services.profiles.open("asha").await.unwrap();
    let second = client.services.profiles.open("ravi").await.unwrap();

    assert_eq!(first.session_id(), second.session_id());
}
