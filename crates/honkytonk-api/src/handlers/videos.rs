use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use honkytonk_core::models::{Page, PageQuery, Video};
use honkytonk_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VideoListQuery {
    /// Maximum number of videos (default 24, max 100)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only videos from this YouTube channel id
    pub channel_id: Option<String>,
    /// Case-insensitive title search
    pub q: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[utoipa::path(
    get,
    path = "/api/v1/videos",
    tag = "videos",
    params(VideoListQuery),
    responses(
        (status = 200, description = "Videos, newest first", body = Page<Video>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VideoListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (limit, offset) = PageQuery {
        limit: query.limit,
        offset: query.offset,
    }
    .resolve();
    let channel_id = non_blank(&query.channel_id);
    let search = non_blank(&query.q);

    let items = state
        .repos
        .videos
        .list(limit, offset, channel_id, search)
        .await?;
    let total = state.repos.videos.count(channel_id, search).await?;

    Ok(Json(Page {
        items,
        total,
        limit,
        offset,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "YouTube video id")
    ),
    responses(
        (status = 200, description = "Video found", body = Video),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .repos
        .videos
        .get_by_video_id(&video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    Ok(Json(video))
}
