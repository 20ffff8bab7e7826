use honkytonk_core::{
    models::{Channel, ChannelCategory},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const CHANNEL_COLUMNS: &str =
    "id, channel_id, name, handle, category, is_active, created_at, updated_at";

/// Repository for the registered YouTube channels
#[derive(Clone)]
pub struct ChannelRepository {
    pool: PgPool,
}

impl ChannelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Channels the video sync should pull, ordered by name
    #[tracing::instrument(skip(self), fields(db.table = "youtube_channels", db.operation = "select"))]
    pub async fn list_active(&self) -> Result<Vec<Channel>, AppError> {
        let channels = sqlx::query_as::<Postgres, Channel>(&format!(
            "SELECT {} FROM youtube_channels WHERE is_active = TRUE ORDER BY name ASC",
            CHANNEL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(channels)
    }

    /// Every channel, including inactive ones
    #[tracing::instrument(skip(self), fields(db.table = "youtube_channels", db.operation = "select"))]
    pub async fn list_all(&self) -> Result<Vec<Channel>, AppError> {
        let channels = sqlx::query_as::<Postgres, Channel>(&format!(
            "SELECT {} FROM youtube_channels ORDER BY name ASC",
            CHANNEL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(channels)
    }

    /// Register a channel. A channel id that is already registered yields `AppError::Conflict`.
    #[tracing::instrument(skip(self), fields(db.table = "youtube_channels", db.operation = "insert"))]
    pub async fn create(
        &self,
        channel_id: &str,
        name: &str,
        handle: Option<&str>,
        category: ChannelCategory,
    ) -> Result<Channel, AppError> {
        let result = sqlx::query_as::<Postgres, Channel>(&format!(
            r#"
            INSERT INTO youtube_channels (channel_id, name, handle, category)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            CHANNEL_COLUMNS
        ))
        .bind(channel_id)
        .bind(name)
        .bind(handle)
        .bind(category)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(channel) => Ok(channel),
            Err(e) => {
                let err = AppError::from(e);
                if err.is_unique_violation() {
                    Err(AppError::Conflict(format!(
                        "Channel {} is already registered",
                        channel_id
                    )))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Update the provided fields; `None` leaves a field unchanged.
    #[tracing::instrument(skip(self), fields(db.table = "youtube_channels", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        category: Option<ChannelCategory>,
        is_active: Option<bool>,
    ) -> Result<Option<Channel>, AppError> {
        let channel = sqlx::query_as::<Postgres, Channel>(&format!(
            r#"
            UPDATE youtube_channels
            SET name = COALESCE($2, name),
                category = COALESCE($3, category),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CHANNEL_COLUMNS
        ))
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(channel)
    }

    /// Returns false when no channel had that id
    #[tracing::instrument(skip(self), fields(db.table = "youtube_channels", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM youtube_channels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "youtube_channels", db.operation = "delete"))]
    pub async fn delete_by_channel_id(&self, channel_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM youtube_channels WHERE channel_id = $1")
            .bind(channel_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
