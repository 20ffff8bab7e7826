use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored YouTube video.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    /// YouTube video id (unique)
    pub video_id: String,
    pub channel_id: String,
    pub channel_name: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub view_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A video ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub video_id: String,
    pub channel_id: String,
    pub channel_name: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub view_count: Option<i64>,
}
