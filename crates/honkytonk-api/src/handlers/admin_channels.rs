use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use honkytonk_core::models::{Channel, CreateChannelRequest, UpdateChannelRequest};
use honkytonk_core::AppError;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/v1/admin/channels",
    tag = "admin",
    security(("admin_key" = [])),
    responses(
        (status = 200, description = "All channels, including inactive ones", body = Vec<Channel>),
        (status = 401, description = "Missing or invalid admin key", body = ErrorResponse)
    )
)]
pub async fn list_all_channels(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let channels = state.repos.channels.list_all().await?;
    Ok(Json(channels))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/channels",
    tag = "admin",
    security(("admin_key" = [])),
    request_body = CreateChannelRequest,
    responses(
        (status = 201, description = "Channel registered", body = Channel),
        (status = 400, description = "Invalid input, or a handle was given without a YouTube API key", body = ErrorResponse),
        (status = 401, description = "Missing or invalid admin key", body = ErrorResponse),
        (status = 404, description = "YouTube has no such channel", body = ErrorResponse),
        (status = 409, description = "Channel already registered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(channel.input = %request.channel))]
pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateChannelRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let channel = state.channel_registry.register(&request).await?;
    Ok((StatusCode::CREATED, Json(channel)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/channels/{id}",
    tag = "admin",
    security(("admin_key" = [])),
    params(
        ("id" = Uuid, Path, description = "Channel row id")
    ),
    request_body = UpdateChannelRequest,
    responses(
        (status = 200, description = "Channel updated", body = Channel),
        (status = 401, description = "Missing or invalid admin key", body = ErrorResponse),
        (status = 404, description = "Channel not found", body = ErrorResponse)
    )
)]
pub async fn update_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateChannelRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let channel = state
        .repos
        .channels
        .update(
            id,
            request.name.as_deref().map(str::trim),
            request.category,
            request.is_active,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Channel {} not found", id)))?;

    tracing::info!(channel_id = %channel.channel_id, is_active = channel.is_active, "Channel updated");
    Ok(Json(channel))
}

/// Removing a channel keeps its already-synced videos.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/channels/{id}",
    tag = "admin",
    security(("admin_key" = [])),
    params(
        ("id" = Uuid, Path, description = "Channel row id")
    ),
    responses(
        (status = 204, description = "Channel removed"),
        (status = 401, description = "Missing or invalid admin key", body = ErrorResponse),
        (status = 404, description = "Channel not found", body = ErrorResponse)
    )
)]
pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.repos.channels.delete(id).await? {
        return Err(AppError::NotFound(format!("Channel {} not found", id)).into());
    }

    tracing::info!(id = %id, "Channel removed");
    Ok(StatusCode::NO_CONTENT)
}
