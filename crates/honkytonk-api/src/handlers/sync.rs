use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use honkytonk_core::models::SyncStatusResponse;
use std::sync::Arc;

/// Latest recorded run of every job, so the frontend can show data freshness.
#[utoipa::path(
    get,
    path = "/api/v1/sync/status",
    tag = "sync",
    responses(
        (status = 200, description = "Latest run per job", body = SyncStatusResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn sync_status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let runs = state.repos.sync_runs.latest_per_job().await?;
    let running = state.runner.running();
    Ok(Json(SyncStatusResponse { runs, running }))
}
