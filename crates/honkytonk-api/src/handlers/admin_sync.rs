use crate::constants::{DEFAULT_RUNS_LIMIT, MAX_RUNS_LIMIT};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use honkytonk_core::models::{SyncJobKind, SyncRun};
use honkytonk_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

fn parse_job(job: &str) -> Result<SyncJobKind, AppError> {
    job.parse::<SyncJobKind>()
        .map_err(|_| AppError::BadRequest(format!("Unknown sync job '{}'; expected videos, chart, top30 or news", job)))
}

/// Run one sync job now and return the recorded run. A job that fails still produces a
/// run with status `failed`; only a job that is already running is refused.
#[utoipa::path(
    post,
    path = "/api/v1/admin/sync/{job}",
    tag = "admin",
    security(("admin_key" = [])),
    params(
        ("job" = String, Path, description = "videos, chart, top30 or news")
    ),
    responses(
        (status = 200, description = "Run finished and recorded", body = SyncRun),
        (status = 400, description = "Unknown job", body = ErrorResponse),
        (status = 401, description = "Missing or invalid admin key", body = ErrorResponse),
        (status = 409, description = "Job already running", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn trigger_sync(
    State(state): State<Arc<AppState>>,
    Path(job): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let kind = parse_job(&job)?;
    let run = state.runner.run(kind).await?;
    Ok(Json(run))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SyncRunsQuery {
    /// Only runs of this job
    pub job: Option<String>,
    /// Maximum number of runs (default 20, max 200)
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/sync/runs",
    tag = "admin",
    security(("admin_key" = [])),
    params(SyncRunsQuery),
    responses(
        (status = 200, description = "Recent runs, newest first", body = Vec<SyncRun>),
        (status = 400, description = "Unknown job", body = ErrorResponse),
        (status = 401, description = "Missing or invalid admin key", body = ErrorResponse)
    )
)]
pub async fn list_sync_runs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SyncRunsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let job = query
        .job
        .as_deref()
        .filter(|j| !j.trim().is_empty())
        .map(parse_job)
        .transpose()?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RUNS_LIMIT)
        .clamp(1, MAX_RUNS_LIMIT);

    let runs = state.repos.sync_runs.list(job, limit).await?;
    Ok(Json(runs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_accepts_aliases() {
        assert_eq!(parse_job("top-30").unwrap(), SyncJobKind::Top30);
        assert_eq!(parse_job("videos").unwrap(), SyncJobKind::Videos);
        assert!(matches!(parse_job("weather"), Err(AppError::BadRequest(_))));
    }
}
