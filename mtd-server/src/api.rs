//! REST API and SSE routes

use crate::mission::MissionView;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::stream::{Stream, StreamExt as FuturesStreamExt};
use mtd_core::{
    error::MissionError,
    model::{Channel, DataMode, DataSource},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::path::PathBuf;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/sources", get(list_sources))
        .route("/api/vehicles", get(list_vehicles))
        .route("/api/history", get(get_history))
        .route("/api/alerts", get(list_alerts))
        .route("/api/source", post(select_source))
        .route("/api/vehicle", post(select_vehicle))
        .route("/api/mode", post(set_mode))
        .route("/api/export", post(export_csv))
        .route("/api/telemetry/stream", get(telemetry_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn reject(err: MissionError) -> (StatusCode, String) {
    let status = match err {
        MissionError::UnknownSource(_) | MissionError::UnknownVehicle { .. } => {
            StatusCode::NOT_FOUND
        }
        MissionError::UnknownMode(_) => StatusCode::BAD_REQUEST,
        MissionError::ModeUnavailable { .. } => StatusCode::CONFLICT,
    };
    (status, err.to_string())
}

// === Read Endpoints ===

async fn get_state(State(state): State<AppState>) -> Json<MissionView> {
    Json(state.view().await)
}

#[derive(Serialize)]
struct SourceInfo {
    id: &'static str,
    label: &'static str,
    active: bool,
}

async fn list_sources(State(state): State<AppState>) -> Json<Vec<SourceInfo>> {
    let active = state.mission.read().await.source();
    let info = DataSource::ALL
        .into_iter()
        .map(|source| SourceInfo {
            id: source.key(),
            label: source.label(),
            active: source == active,
        })
        .collect();
    Json(info)
}

async fn list_vehicles(State(state): State<AppState>) -> Json<Vec<Value>> {
    let mission = state.mission.read().await;
    let selected = mission.vehicle();
    let info = mission
        .source()
        .vehicles()
        .into_iter()
        .map(|vehicle| {
            json!({
                "id": vehicle.id,
                "name": vehicle.name,
                "category": vehicle.category,
                "availability": vehicle.availability,
                "message": vehicle.availability.message(),
                "selected": vehicle == selected,
            })
        })
        .collect();
    Json(info)
}

async fn get_history(State(state): State<AppState>) -> Json<Value> {
    let mission = state.mission.read().await;
    let history = mission.history();
    let channels: Vec<Value> = Channel::ALL
        .into_iter()
        .map(|channel| {
            let points: Vec<_> = history.get(channel).iter().collect();
            json!({
                "channel": channel.key(),
                "label": channel.label(),
                "unit": channel.unit(),
                "points": points,
            })
        })
        .collect();
    Json(json!({ "channels": channels }))
}

async fn list_alerts(State(state): State<AppState>) -> Json<Vec<Value>> {
    let mission = state.mission.read().await;
    let alerts = mission
        .alerts()
        .log()
        .map(|alert| {
            json!({
                "timestamp": alert.timestamp,
                "severity": alert.severity,
                "condition": alert.condition,
                "message": alert.message,
                "line": alert.display_line(),
            })
        })
        .collect();
    Json(alerts)
}

// === Selection Endpoints ===

#[derive(Deserialize)]
struct SelectRequest {
    id: String,
}

async fn select_source(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<Value> {
    let source: DataSource = request.id.parse().map_err(reject)?;
    let vehicle = state.select_source(source).await;
    Ok(Json(json!({
        "source": source.key(),
        "vehicle": vehicle,
        "message": vehicle.availability.message(),
    })))
}

async fn select_vehicle(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<Value> {
    let vehicle = state.select_vehicle(&request.id).await.map_err(reject)?;
    Ok(Json(json!({
        "vehicle": vehicle,
        "mode": vehicle.availability.default_mode(),
        "message": vehicle.availability.message(),
    })))
}

#[derive(Deserialize)]
struct ModeRequest {
    mode: String,
}

async fn set_mode(
    State(state): State<AppState>,
    Json(request): Json<ModeRequest>,
) -> ApiResult<Value> {
    let mode: DataMode = request.mode.parse().map_err(reject)?;
    state.set_mode(mode).await.map_err(reject)?;
    Ok(Json(json!({ "mode": mode })))
}

// === Export Endpoint ===

#[derive(Deserialize)]
struct ExportRequest {
    path: Option<PathBuf>,
}

async fn export_csv(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> ApiResult<Value> {
    match state.export_csv(request.path.as_deref()).await {
        Ok((outcome, path)) => {
            let mut body = json!(outcome);
            body["path"] = json!(path.display().to_string());
            Ok(Json(body))
        }
        Err(e) => {
            tracing::error!("{}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

// === Telemetry Stream Endpoint ===

async fn telemetry_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(update) => match serde_json::to_string(&update) {
                Ok(json) => Some(Ok(Event::default().data(json))),
                Err(e) => {
                    tracing::error!("Failed to serialize update: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Broadcast stream error: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
