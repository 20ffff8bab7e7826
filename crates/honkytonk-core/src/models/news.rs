use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored news article. `url` is the external identifier.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct NewsArticle {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNewsArticle {
    pub url: String,
    pub title: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}
