//! Integration tests for the mtd-server HTTP API
//!
//! Uses tower::ServiceExt::oneshot to test routes directly without binding a port.

use axum::body::Body;
use http_body_util::BodyExt;
use hyper::Request;
use mtd_core::{units::Celsius, Snapshot};
use mtd_server::{api::create_router, config::Settings, state::AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper: build a router with AppState returned for further manipulation.
/// The temp dir backs relative export paths and must outlive the state.
fn app_with_state() -> (axum::Router, AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        seed: Some(42),
        export_dir: Some(dir.path().to_path_buf()),
        ..Settings::default()
    };
    let state = AppState::new(&settings).unwrap();
    let router = create_router(state.clone());
    (router, state, dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: collect response body into bytes
async fn body_bytes(body: Body) -> Vec<u8> {
    let collected = body.collect().await.unwrap();
    collected.to_bytes().to_vec()
}

/// Helper: collect response body into JSON
async fn body_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

// ==================== GET /api/state ====================

#[tokio::test]
async fn test_get_state_reports_initial_selection() {
    let (app, _state, _dir) = app_with_state();

    let response = app.oneshot(get("/api/state")).await.unwrap();
    assert_eq!(response.status(), 200);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["source"], "simulated");
    assert_eq!(json["vehicle"]["id"], "iss");
    assert_eq!(json["mode"], "realtime");
    assert_eq!(json["status_text"], "STATUS: NOMINAL");
    assert_eq!(json["live"]["battery"], 100.0);
    assert_eq!(json["export_enabled"], true);
    assert_eq!(json["history_len"], 720);
}

// ==================== GET /api/sources ====================

#[tokio::test]
async fn test_get_sources_lists_catalog_with_active_flag() {
    let (app, _state, _dir) = app_with_state();

    let response = app.oneshot(get("/api/sources")).await.unwrap();
    assert_eq!(response.status(), 200);

    let json = body_json(response.into_body()).await;
    let sources = json.as_array().unwrap();
    assert_eq!(sources.len(), 13);

    let active: Vec<_> = sources.iter().filter(|s| s["active"] == true).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], "simulated");
}

// ==================== POST /api/source ====================

#[tokio::test]
async fn test_select_source_narrows_vehicle_list() {
    let (app, _state, _dir) = app_with_state();

    let response = app
        .clone()
        .oneshot(post_json("/api/source", r#"{"id":"opensky"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["vehicle"]["id"], "adsb-aircraft");

    let response = app.oneshot(get("/api/vehicles")).await.unwrap();
    let json = body_json(response.into_body()).await;
    let vehicles = json.as_array().unwrap();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0]["selected"], true);
}

#[tokio::test]
async fn test_select_unknown_source_returns_404() {
    let (app, _state, _dir) = app_with_state();

    let response = app
        .oneshot(post_json("/api/source", r#"{"id":"carrier-pigeon"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_source_switch_drops_previous_snapshot() {
    let (app, state, _dir) = app_with_state();

    state
        .mailbox
        .publish(Snapshot::default().with_temperature(Celsius(88.0)));
    assert_eq!(state.tick().await.live.temperature, 88.0);

    let response = app
        .oneshot(post_json("/api/source", r#"{"id":"iss_tle"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(state.mailbox.latest().is_none());
}

// ==================== GET /api/vehicles ====================

#[tokio::test]
async fn test_get_vehicles_for_simulated_source() {
    let (app, _state, _dir) = app_with_state();

    let response = app.oneshot(get("/api/vehicles")).await.unwrap();
    assert_eq!(response.status(), 200);

    let json = body_json(response.into_body()).await;
    let ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        ids,
        ["iss", "adsb-aircraft", "ais-vessel", "mars-insight", "deep-space-probe"]
    );
}

// ==================== POST /api/vehicle ====================

#[tokio::test]
async fn test_select_historical_vehicle_switches_mode() {
    let (app, _state, _dir) = app_with_state();

    let response = app
        .clone()
        .oneshot(post_json("/api/vehicle", r#"{"id":"mars-insight"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["mode"], "historical");
    assert_eq!(json["message"], "This vehicle supports Historical data only.");

    let response = app.oneshot(get("/api/state")).await.unwrap();
    let json = body_json(response.into_body()).await;
    assert_eq!(json["mode"], "historical");
}

#[tokio::test]
async fn test_select_vehicle_outside_source_returns_404() {
    let (app, _state, _dir) = app_with_state();

    app.clone()
        .oneshot(post_json("/api/source", r#"{"id":"aishub"}"#))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json("/api/vehicle", r#"{"id":"iss"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

// ==================== POST /api/mode ====================

#[tokio::test]
async fn test_set_mode_round_trip() {
    let (app, _state, _dir) = app_with_state();

    let response = app
        .clone()
        .oneshot(post_json("/api/mode", r#"{"mode":"historical"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = app
        .oneshot(post_json("/api/mode", r#"{"mode":"real-time"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["mode"], "realtime");
}

#[tokio::test]
async fn test_unavailable_mode_returns_409() {
    let (app, _state, _dir) = app_with_state();

    app.clone()
        .oneshot(post_json("/api/vehicle", r#"{"id":"deep-space-probe"}"#))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json("/api/mode", r#"{"mode":"realtime"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_unknown_mode_returns_400() {
    let (app, _state, _dir) = app_with_state();

    let response = app
        .oneshot(post_json("/api/mode", r#"{"mode":"sideways"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

// ==================== GET /api/history ====================

#[tokio::test]
async fn test_get_history_returns_four_seeded_series() {
    let (app, _state, _dir) = app_with_state();

    let response = app.oneshot(get("/api/history")).await.unwrap();
    assert_eq!(response.status(), 200);

    let json = body_json(response.into_body()).await;
    let channels = json["channels"].as_array().unwrap();
    assert_eq!(channels.len(), 4);
    for channel in channels {
        let points = channel["points"].as_array().unwrap();
        assert_eq!(points.len(), 720, "channel {}", channel["channel"]);
        let first = points[0]["timestamp"].as_i64().unwrap();
        let second = points[1]["timestamp"].as_i64().unwrap();
        assert_eq!(second - first, 3_600_000);
    }
}

// ==================== GET /api/alerts ====================

#[tokio::test]
async fn test_alerts_raised_by_fused_snapshot() {
    let (app, state, _dir) = app_with_state();

    let response = app.clone().oneshot(get("/api/alerts")).await.unwrap();
    let json = body_json(response.into_body()).await;
    assert!(json.as_array().unwrap().is_empty());

    state
        .mailbox
        .publish(Snapshot::default().with_temperature(Celsius(90.0)));
    let first = state.tick().await;
    assert_eq!(first.raised.len(), 1);
    // Still above threshold: no second alert
    state.tick().await;

    let response = app.clone().oneshot(get("/api/alerts")).await.unwrap();
    let json = body_json(response.into_body()).await;
    let alerts = json.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["message"], "WARN: Thermal spike detected (90.00 C)");
    assert_eq!(alerts[0]["severity"], "warning");
    assert!(alerts[0]["line"].as_str().unwrap().starts_with('['));

    let response = app.oneshot(get("/api/state")).await.unwrap();
    let json = body_json(response.into_body()).await;
    assert_eq!(json["status_text"], "STATUS: ATTENTION REQUIRED");
}

// ==================== POST /api/export ====================

#[tokio::test]
async fn test_export_writes_csv_into_export_dir() {
    let (app, _state, dir) = app_with_state();

    let response = app
        .oneshot(post_json("/api/export", r#"{"path":"mission.csv"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["outcome"], "written");
    assert_eq!(json["rows"], 720);

    let csv = std::fs::read_to_string(dir.path().join("mission.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("timestamp,battery,temperature,signal,velocity"));
    assert_eq!(lines.count(), 720);
}

#[tokio::test]
async fn test_export_failure_returns_500() {
    let (app, _state, dir) = app_with_state();
    // A regular file where a directory is needed
    std::fs::write(dir.path().join("blocker"), b"").unwrap();

    let response = app
        .oneshot(post_json("/api/export", r#"{"path":"blocker/mission.csv"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    let body = String::from_utf8(body_bytes(response.into_body()).await).unwrap();
    assert!(body.starts_with("Failed to export CSV to"), "got: {}", body);
}

// ==================== GET /api/telemetry/stream ====================

#[tokio::test]
async fn test_telemetry_stream_returns_sse_content_type() {
    let (app, _state, _dir) = app_with_state();

    let response = app.oneshot(get("/api/telemetry/stream")).await.unwrap();
    assert_eq!(response.status(), 200);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(
        content_type.contains("text/event-stream"),
        "SSE endpoint should return text/event-stream, got: {}",
        content_type
    );
}

#[tokio::test]
async fn test_telemetry_stream_receives_tick() {
    let (app, state, _dir) = app_with_state();

    // Tick shortly after the stream connects
    let ticker = state.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        ticker.tick().await;
    });

    let response = app.oneshot(get("/api/telemetry/stream")).await.unwrap();
    assert_eq!(response.status(), 200);

    // Read the body with a timeout to avoid hanging forever
    let body = response.into_body();
    let result = tokio::time::timeout(std::time::Duration::from_secs(3), async {
        let mut stream = body.into_data_stream();
        use futures::StreamExt;
        if let Some(Ok(chunk)) = stream.next().await {
            return Some(String::from_utf8(chunk.to_vec()).unwrap());
        }
        None
    })
    .await;

    if let Ok(Some(text)) = result {
        // SSE events are formatted as "data: {...}\n\n"
        assert!(text.contains("data:"), "got: {}", text);
        assert!(text.contains("\"live\""), "SSE data should carry live values");
    }
}
