use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One row of the Top-30 list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Top30Entry {
    pub id: Uuid,
    pub position: i32,
    pub title: String,
    pub artist: String,
    pub label: Option<String>,
    pub spins: Option<i32>,
    pub movement: Option<i32>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTop30Entry {
    pub position: i32,
    pub title: String,
    pub artist: String,
    pub label: Option<String>,
    pub spins: Option<i32>,
    pub movement: Option<i32>,
    pub image_url: Option<String>,
}
