//! Integration tests for automix-api endpoints
//!
//! Covers request validation, preset-driven crossfades, empty-pool
//! handling, unknown-preset fallback, and plan broadcasting.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use automix_api::{build_router, AppState};
use automix_core::events::MixEvent;

/// Test helper: create app with a fresh event bus
fn setup_app() -> (axum::Router, AppState) {
    let state = AppState::new(16);
    (build_router(state.clone()), state)
}

/// Test helper: GET request
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: POST request with a JSON body
fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn track(id: &str, bpm: f64, key: &str) -> Value {
    json!({
        "id": id,
        "duration_sec": 300.0,
        "bpm": bpm,
        "key": key,
        "path": format!("/music/{}.flac", id),
    })
}

fn club_pool() -> Value {
    json!([
        track("a", 128.0, "8A"),
        track("b", 127.0, "8B"),
        track("c", 129.0, "9A"),
        track("d", 126.0, "7A"),
    ])
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _state) = setup_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "automix-api");
    assert!(body["version"].is_string());
}

// =============================================================================
// Autoplaylist: happy path
// =============================================================================

#[tokio::test]
async fn test_autoplaylist_returns_plan_and_exports() {
    let (app, _state) = setup_app();

    let request = post_json(
        "/api/autoplaylist",
        &json!({ "tracks": club_pool(), "minutes": 15, "beam_width": 8 }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["ok"], true);

    let items = body["plan"]["items"].as_array().unwrap();
    assert!(!items.is_empty());
    assert_eq!(items.last().unwrap()["crossfade_beats"], 0);

    let m3u = body["m3u"].as_str().unwrap();
    assert!(m3u.starts_with("#EXTM3U"));
    let txt = body["txt"].as_str().unwrap();
    assert!(txt.starts_with("# AutoMix Playlist "));
}

#[tokio::test]
async fn test_autoplaylist_defaults_apply() {
    // minutes/beam_width/preset all optional; classic crossfade is 24
    let (app, _state) = setup_app();

    let request = post_json("/api/autoplaylist", &json!({ "tracks": club_pool() }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let items = body["plan"]["items"].as_array().unwrap();
    assert!(items.len() >= 2);
    assert_eq!(items[0]["crossfade_beats"], 24);
}

#[tokio::test]
async fn test_empty_pool_is_ok_with_empty_plan() {
    let (app, _state) = setup_app();

    let request = post_json("/api/autoplaylist", &json!({ "tracks": [] }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["ok"], true);
    assert!(body["plan"]["items"].as_array().unwrap().is_empty());
    assert_eq!(body["plan"]["total_sec"], 0.0);
    assert_eq!(body["plan"]["avg_score"], 0.0);
}

// =============================================================================
// Autoplaylist: presets and style
// =============================================================================

#[tokio::test]
async fn test_hard_techno_preset_crossfade() {
    let (app, _state) = setup_app();

    let pool = json!([
        track("x", 144.0, "8A"),
        track("y", 146.0, "8A"),
        track("z", 145.0, "9A"),
    ]);
    let request = post_json(
        "/api/autoplaylist",
        &json!({ "tracks": pool, "minutes": 15, "beam_width": 4, "preset": "hard_techno" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let items = body["plan"]["items"].as_array().unwrap();
    assert!(items.len() >= 2);
    for item in &items[..items.len() - 1] {
        assert_eq!(item["crossfade_beats"], 12);
    }
}

#[tokio::test]
async fn test_unknown_preset_falls_back_to_classic() {
    let (app, _state) = setup_app();

    let request = post_json(
        "/api/autoplaylist",
        &json!({ "tracks": club_pool(), "minutes": 15, "preset": "nosuchstyle" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let items = body["plan"]["items"].as_array().unwrap();
    assert_eq!(items[0]["crossfade_beats"], 24);
}

#[tokio::test]
async fn test_style_override_uses_default_crossfade() {
    let (app, _state) = setup_app();

    let request = post_json(
        "/api/autoplaylist",
        &json!({ "tracks": club_pool(), "minutes": 15, "style": "default" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let items = body["plan"]["items"].as_array().unwrap();
    assert_eq!(items[0]["crossfade_beats"], 16);
}

// =============================================================================
// Autoplaylist: validation
// =============================================================================

#[tokio::test]
async fn test_rejects_nonpositive_minutes() {
    let (app, _state) = setup_app();

    let request = post_json(
        "/api/autoplaylist",
        &json!({ "tracks": club_pool(), "minutes": 0 }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_rejects_zero_beam_width() {
    let (app, _state) = setup_app();

    let request = post_json(
        "/api/autoplaylist",
        &json!({ "tracks": club_pool(), "beam_width": 0 }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rejects_invalid_track_fields() {
    let (app, _state) = setup_app();

    let bad = track("bad", 0.0, "8A"); // bpm must be > 0
    let request = post_json("/api/autoplaylist", &json!({ "tracks": [bad] }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_rejects_malformed_key() {
    let (app, _state) = setup_app();

    // Key "13C" fails CamelotKey deserialization before the handler runs
    let request = post_json(
        "/api/autoplaylist",
        &json!({ "tracks": [track("bad", 128.0, "13C")] }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_rejects_non_array_pool() {
    let (app, _state) = setup_app();

    let request = post_json("/api/autoplaylist", &json!({ "tracks": "not-a-pool" }));
    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

// =============================================================================
// Event broadcasting
// =============================================================================

#[tokio::test]
async fn test_generated_plan_is_broadcast() {
    let (app, state) = setup_app();
    let mut rx = state.event_bus.subscribe();

    let request = post_json(
        "/api/autoplaylist",
        &json!({ "tracks": club_pool(), "minutes": 15 }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = rx.try_recv().expect("PlanGenerated should be broadcast");
    match event {
        MixEvent::PlanGenerated { preset, plan, m3u, .. } => {
            assert_eq!(preset, "classic");
            assert!(!plan.items.is_empty());
            assert!(m3u.starts_with("#EXTM3U"));
        }
    }
}

#[tokio::test]
async fn test_sse_route_exists() {
    let (app, _state) = setup_app();

    let response = app.oneshot(get("/api/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/event-stream"));
}
