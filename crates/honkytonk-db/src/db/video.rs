use super::contains_pattern;
use chrono::{DateTime, Utc};
use honkytonk_core::{
    models::{NewVideo, Video},
    AppError,
};
use sqlx::{PgPool, Postgres};
use std::collections::HashSet;

const VIDEO_COLUMNS: &str = "id, video_id, channel_id, channel_name, title, description, \
     thumbnail_url, published_at, view_count, created_at";

/// Repository for synced YouTube videos
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Which of the given video ids are already stored
    #[tracing::instrument(skip(self, video_ids), fields(db.table = "videos", db.operation = "select", candidates = video_ids.len()))]
    pub async fn existing_ids(&self, video_ids: &[String]) -> Result<HashSet<String>, AppError> {
        if video_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = sqlx::query_scalar::<Postgres, String>(
            "SELECT video_id FROM videos WHERE video_id = ANY($1)",
        )
        .bind(video_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Insert videos, skipping ids that already exist. Returns the number of rows written.
    #[tracing::instrument(skip(self, videos), fields(db.table = "videos", db.operation = "insert", count = videos.len()))]
    pub async fn insert_many(&self, videos: &[NewVideo]) -> Result<u64, AppError> {
        if videos.is_empty() {
            return Ok(0);
        }

        let mut video_ids = Vec::with_capacity(videos.len());
        let mut channel_ids = Vec::with_capacity(videos.len());
        let mut channel_names = Vec::with_capacity(videos.len());
        let mut titles = Vec::with_capacity(videos.len());
        let mut descriptions: Vec<Option<String>> = Vec::with_capacity(videos.len());
        let mut thumbnails: Vec<Option<String>> = Vec::with_capacity(videos.len());
        let mut published: Vec<DateTime<Utc>> = Vec::with_capacity(videos.len());
        let mut views: Vec<Option<i64>> = Vec::with_capacity(videos.len());

        for video in videos {
            video_ids.push(video.video_id.clone());
            channel_ids.push(video.channel_id.clone());
            channel_names.push(video.channel_name.clone());
            titles.push(video.title.clone());
            descriptions.push(video.description.clone());
            thumbnails.push(video.thumbnail_url.clone());
            published.push(video.published_at);
            views.push(video.view_count);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO videos (
                video_id, channel_id, channel_name, title, description,
                thumbnail_url, published_at, view_count
            )
            SELECT * FROM UNNEST(
                $1::text[], $2::text[], $3::text[], $4::text[], $5::text[],
                $6::text[], $7::timestamptz[], $8::bigint[]
            )
            ON CONFLICT (video_id) DO NOTHING
            "#,
        )
        .bind(&video_ids)
        .bind(&channel_ids)
        .bind(&channel_names)
        .bind(&titles)
        .bind(&descriptions)
        .bind(&thumbnails)
        .bind(&published)
        .bind(&views)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Newest first, optionally restricted to one channel and/or a title search
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
        channel_id: Option<&str>,
        query: Option<&str>,
    ) -> Result<Vec<Video>, AppError> {
        let pattern = query.map(contains_pattern);
        let videos = sqlx::query_as::<Postgres, Video>(&format!(
            r#"
            SELECT {}
            FROM videos
            WHERE ($1::text IS NULL OR channel_id = $1)
              AND ($2::text IS NULL OR title ILIKE $2)
            ORDER BY published_at DESC, id ASC
            LIMIT $3 OFFSET $4
            "#,
            VIDEO_COLUMNS
        ))
        .bind(channel_id)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "count"))]
    pub async fn count(&self, channel_id: Option<&str>, query: Option<&str>) -> Result<i64, AppError> {
        let pattern = query.map(contains_pattern);
        let total = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT COUNT(*)
            FROM videos
            WHERE ($1::text IS NULL OR channel_id = $1)
              AND ($2::text IS NULL OR title ILIKE $2)
            "#,
        )
        .bind(channel_id)
        .bind(pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn get_by_video_id(&self, video_id: &str) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(&format!(
            "SELECT {} FROM videos WHERE video_id = $1",
            VIDEO_COLUMNS
        ))
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }
}
