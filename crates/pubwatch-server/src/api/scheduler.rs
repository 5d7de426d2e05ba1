//! Scheduler control routes.

use axum::extract::State;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct JobData {
    pub name: &'static str,
    pub scheduled: bool,
    pub next_tick: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct StatusData {
    pub running: bool,
    pub jobs: Vec<JobData>,
}

async fn status_data(state: &AppState) -> StatusData {
    let status = state.scheduler.status().await;
    StatusData {
        running: status.running,
        jobs: status
            .jobs
            .into_iter()
            .map(|j| JobData {
                name: j.name,
                scheduled: j.scheduled,
                next_tick: j.next_tick,
            })
            .collect(),
    }
}

/// `GET /api/v1/scheduler/status`
pub(super) async fn status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<StatusData>> {
    Json(ApiResponse {
        data: status_data(&state).await,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// `POST /api/v1/scheduler/stop`
pub(super) async fn stop(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<StatusData>>, ApiError> {
    state.scheduler.stop_all().await.map_err(|e| {
        tracing::error!(error = %e, "scheduler stop failed");
        ApiError::new(req_id.0.clone(), "internal_error", "scheduler stop failed")
    })?;

    Ok(Json(ApiResponse {
        data: status_data(&state).await,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/v1/scheduler/restart`
pub(super) async fn restart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<StatusData>>, ApiError> {
    state.scheduler.restart_all().await.map_err(|e| {
        tracing::error!(error = %e, "scheduler restart failed");
        ApiError::new(req_id.0.clone(), "internal_error", "scheduler restart failed")
    })?;

    Ok(Json(ApiResponse {
        data: status_data(&state).await,
        meta: ResponseMeta::new(req_id.0),
    }))
}
