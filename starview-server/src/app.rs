//! HTTP routes backing the 3D viewer

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use starview_backend::config::FetchConfig;
use starview_backend::export::{self, StarDocument, CSV_FILE, JSON_FILE};
use starview_backend::{FetchError, StarField, StarPipeline};
use starview_common::{FetchParams, SourceId};

#[derive(Clone)]
pub struct AppState {
    pipeline: StarPipeline,
    defaults: FetchConfig,
    snapshot: Arc<RwLock<Option<StarField>>>,
}

impl AppState {
    pub fn new(pipeline: StarPipeline, defaults: FetchConfig) -> Self {
        Self {
            pipeline,
            defaults,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StarsQuery {
    count: Option<i64>,
    max_distance: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

fn no_snapshot() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "no_snapshot",
        "No star field has been fetched yet",
    )
}

fn attachment(content_type: &'static str, filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Stats endpoint - returns basic server information
async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let guard = state.snapshot.read().await;
    Json(serde_json::json!({
        "status": "running",
        "service": "starview-server",
        "version": env!("CARGO_PKG_VERSION"),
        "stars_loaded": guard.as_ref().map(|field| field.len()).unwrap_or(0),
        "fetched_at": guard.as_ref().map(|field| field.fetched_at),
    }))
}

async fn fetch_stars(State(state): State<AppState>, Query(query): Query<StarsQuery>) -> Response {
    let count = query.count.unwrap_or(state.defaults.star_count);
    let max_distance = query.max_distance.unwrap_or(state.defaults.max_distance_pc);
    if !FetchParams::is_in_range(count, max_distance) {
        warn!(
            "Requested count={} max_distance={} out of range, clamping",
            count, max_distance
        );
    }
    let params = FetchParams::new(count, max_distance);

    match state.pipeline.run(params).await {
        Ok(field) => {
            info!("Serving {} stars within {} pc", field.len(), params.max_distance_parsecs());
            let document = StarDocument::from_stars(field.stars());
            *state.snapshot.write().await = Some(field);
            Json(document).into_response()
        }
        Err(e @ FetchError::EmptyResult { .. }) => {
            warn!("{}", e);
            *state.snapshot.write().await = Some(StarField::new(params, Vec::new(), Vec::new()));
            Json(StarDocument::from_stars(&[]).with_warning(e.to_string())).into_response()
        }
        Err(e) => {
            warn!("Star fetch failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.kind().as_str(), e.to_string())
        }
    }
}

async fn current_stars(State(state): State<AppState>) -> Response {
    let guard = state.snapshot.read().await;
    match guard.as_ref() {
        Some(field) => Json(StarDocument::from_stars(field.stars())).into_response(),
        None => no_snapshot(),
    }
}

async fn select_star(State(state): State<AppState>, Path(source_id): Path<SourceId>) -> Response {
    let guard = state.snapshot.read().await;
    let Some(field) = guard.as_ref() else {
        return no_snapshot();
    };
    match field.select(source_id) {
        Some(star) => Json(star).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "unknown_star",
            format!("Star {} is not in the current field", source_id),
        ),
    }
}

async fn summary(State(state): State<AppState>) -> Response {
    let guard = state.snapshot.read().await;
    let Some(field) = guard.as_ref() else {
        return no_snapshot();
    };
    match field.stats() {
        Some(stats) => Json(stats).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "empty_field",
            "The current star field is empty",
        ),
    }
}

async fn export_json(State(state): State<AppState>) -> Response {
    let guard = state.snapshot.read().await;
    let Some(field) = guard.as_ref() else {
        return no_snapshot();
    };
    match export::to_json_string(&StarDocument::from_stars(field.stars())) {
        Ok(body) => attachment("application/json", JSON_FILE, body),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", e.to_string()),
    }
}

async fn export_csv(State(state): State<AppState>) -> Response {
    let guard = state.snapshot.read().await;
    let Some(field) = guard.as_ref() else {
        return no_snapshot();
    };
    match export::to_csv_string(field.stars()) {
        Ok(body) => attachment("text/csv", CSV_FILE, body),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", e.to_string()),
    }
}

/// API routes; static assets and middleware are layered on in `main`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(stats))
        .route("/api/stars", get(fetch_stars))
        .route("/api/stars/current", get(current_stars))
        .route("/api/stars/{source_id}", get(select_star))
        .route("/api/summary", get(summary))
        .route("/api/export/json", get(export_json))
        .route("/api/export/csv", get(export_csv))
        .with_state(state)
}
