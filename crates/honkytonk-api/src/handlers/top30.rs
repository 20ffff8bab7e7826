use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use honkytonk_core::models::Top30Entry;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/top30",
    tag = "charts",
    responses(
        (status = 200, description = "Top-30 rows by position", body = Vec<Top30Entry>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_top30(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let entries = state.repos.top30.list().await?;
    Ok(Json(entries))
}
