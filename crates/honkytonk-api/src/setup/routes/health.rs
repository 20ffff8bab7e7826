//! Health check handlers and response types.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub database: String,
}

/// Liveness check: the process is running.
pub async fn liveness_check(_state: Arc<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Health check - database reachable.
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    let pool = state.pool.clone();
    let database = run_check(
        TIMEOUT,
        async move { sqlx::query("SELECT 1").execute(&pool).await.map(drop) },
        "unhealthy",
    )
    .await;

    if database == "healthy" {
        (
            StatusCode::OK,
            Json(HealthCheckResponse {
                status: "healthy".to_string(),
                database,
            }),
        )
    } else {
        tracing::error!(database = %database, "Health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthCheckResponse {
                status: "unhealthy".to_string(),
                database,
            }),
        )
    }
}
