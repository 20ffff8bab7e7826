use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use honkytonk_core::models::Channel;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/channels",
    tag = "channels",
    responses(
        (status = 200, description = "Active channels, by name", body = Vec<Channel>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_channels(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let channels = state.repos.channels.list_active().await?;
    Ok(Json(channels))
}
