//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use super::middleware::RequestId;

use crate::domain::{VideoAnalytics, ViewerEvent};
use crate::error::AppError;
use crate::handlers::{AnalyticsQueryHandler, ServiceStats, TrackEventCommand, TrackEventHandler};
use crate::jobs::BatchReport;
use crate::state::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackEventResponse {
    pub status: String,
    pub event_id: u64,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/events/track", post(track_event))
        .route("/analytics/video/:video_id", get(get_video_analytics))
        .route("/analytics/video/:video_id/cached", get(get_cached_analytics))
        .route("/analytics/batch/process", post(run_batch))
        .route("/analytics/stats", get(get_stats))
}

// =========================================================================
// GET /
// =========================================================================

/// Static service descriptor
async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "FanTV Analytics Engine".to_string(),
        version: "1.0".to_string(),
        status: "running".to_string(),
    })
}

// =========================================================================
// POST /events/track
// =========================================================================

/// Record a viewer event; responds before background work runs
async fn track_event(
    State(state): State<AppState>,
    Json(event): Json<ViewerEvent>,
) -> Result<Json<TrackEventResponse>, AppError> {
    let handler = TrackEventHandler::new(&state);
    let result = handler.execute(TrackEventCommand::new(event)).await?;

    Ok(Json(TrackEventResponse {
        status: "event saved".to_string(),
        event_id: result.event_id,
    }))
}

// =========================================================================
// GET /analytics/video/:video_id
// =========================================================================

/// Aggregate analytics for a video; videos without events get a zero record
async fn get_video_analytics(
    State(state): State<AppState>,
    Path(video_id): Path<u64>,
) -> Json<VideoAnalytics> {
    let handler = AnalyticsQueryHandler::new(&state);
    Json(handler.video_analytics(video_id).await)
}

// =========================================================================
// GET /analytics/video/:video_id/cached
// =========================================================================

/// Last computed analytics without recomputation
async fn get_cached_analytics(
    State(state): State<AppState>,
    Path(video_id): Path<u64>,
) -> Result<Json<VideoAnalytics>, AppError> {
    let handler = AnalyticsQueryHandler::new(&state);
    Ok(Json(handler.cached_analytics(video_id).await?))
}

// =========================================================================
// POST /analytics/batch/process
// =========================================================================

/// Run a batch sweep and wait for it to finish
///
/// The sweep runs on its own task so a dropped request cannot cancel it midway.
/// That task is tagged with the triggering request id.
async fn run_batch(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
) -> Result<Json<BatchReport>, AppError> {
    let span = match request_id {
        Some(Extension(RequestId(id))) => tracing::info_span!("batch_run", request_id = %id),
        None => tracing::info_span!("batch_run"),
    };

    let batch = state.batch.clone();
    let report = tokio::spawn(async move { batch.run().await }.instrument(span))
        .await
        .map_err(|e| AppError::Internal(format!("batch task failed: {}", e)))??;

    Ok(Json(report))
}

// =========================================================================
// GET /analytics/stats
// =========================================================================

async fn get_stats(State(state): State<AppState>) -> Json<ServiceStats> {
    let handler = AnalyticsQueryHandler::new(&state);
    Json(handler.stats().await)
}
