//! Handlers for the `/jobs` resource: polling and cancellation.

use axum::extract::{Path, State};
use axum::Json;
use scenegen_core::Job;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /jobs/{id}
///
/// Returns the tracked job record, or `404 {"detail": "Job not found"}`
/// when the id is unknown (never tracked, or already reclaimed).
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Job>> {
    let job = state
        .jobs
        .get(&id)
        .await
        .ok_or_else(|| AppError::job_not_found(&id))?;
    Ok(Json(job))
}

/// POST /jobs/{id}/cancel
///
/// Cooperative cancellation: flips a `queued` or `running` job to
/// `cancelled`; the background task observes the flag at its next
/// checkpoint and abandons the work. A job that already reached a
/// terminal state is left untouched and its current status is reported.
pub async fn cancel_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let status = state
        .jobs
        .cancel(&id)
        .await
        .ok_or_else(|| AppError::job_not_found(&id))?;

    tracing::info!(job_id = %id, status = ?status, "Cancellation requested");

    Ok(Json(json!({ "status": status })))
}
