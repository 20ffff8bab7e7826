use super::transaction::TransactionGuard;
use honkytonk_core::{
    models::{NewTop30Entry, Top30Entry},
    AppError,
};
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct Top30Repository {
    pool: PgPool,
}

impl Top30Repository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace the whole list in one transaction.
    #[tracing::instrument(skip(self, entries), fields(db.table = "top30_entries", db.operation = "replace", count = entries.len()))]
    pub async fn replace_all(&self, entries: &[NewTop30Entry]) -> Result<u64, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool, "replace_top30").await?;

        sqlx::query("DELETE FROM top30_entries")
            .execute(&mut **tx)
            .await?;

        let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
        let titles: Vec<String> = entries.iter().map(|e| e.title.clone()).collect();
        let artists: Vec<String> = entries.iter().map(|e| e.artist.clone()).collect();
        let labels: Vec<Option<String>> = entries.iter().map(|e| e.label.clone()).collect();
        let spins: Vec<Option<i32>> = entries.iter().map(|e| e.spins).collect();
        let movements: Vec<Option<i32>> = entries.iter().map(|e| e.movement).collect();
        let images: Vec<Option<String>> = entries.iter().map(|e| e.image_url.clone()).collect();

        let inserted = sqlx::query(
            r#"
            INSERT INTO top30_entries (position, title, artist, label, spins, movement, image_url)
            SELECT * FROM UNNEST(
                $1::int4[], $2::text[], $3::text[], $4::text[], $5::int4[], $6::int4[], $7::text[]
            )
            "#,
        )
        .bind(&positions)
        .bind(&titles)
        .bind(&artists)
        .bind(&labels)
        .bind(&spins)
        .bind(&movements)
        .bind(&images)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok(inserted)
    }

    #[tracing::instrument(skip(self), fields(db.table = "top30_entries", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<Top30Entry>, AppError> {
        let entries = sqlx::query_as::<Postgres, Top30Entry>(
            r#"
            SELECT id, position, title, artist, label, spins, movement, image_url, created_at
            FROM top30_entries
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
