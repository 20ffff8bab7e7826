use super::transaction::TransactionGuard;
use chrono::NaiveDate;
use honkytonk_core::{
    models::{ChartEntry, NewChartEntry},
    AppError,
};
use sqlx::{PgPool, Postgres};

/// Repository for scraped chart rows
#[derive(Clone)]
pub struct ChartRepository {
    pool: PgPool,
}

impl ChartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete every row of `chart_name` and insert `entries` in one transaction.
    #[tracing::instrument(skip(self, entries), fields(db.table = "chart_entries", db.operation = "replace", count = entries.len()))]
    pub async fn replace_chart(
        &self,
        chart_name: &str,
        chart_date: Option<NaiveDate>,
        entries: &[NewChartEntry],
    ) -> Result<u64, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool, "replace_chart").await?;

        let deleted = sqlx::query("DELETE FROM chart_entries WHERE chart_name = $1")
            .bind(chart_name)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
        let titles: Vec<String> = entries.iter().map(|e| e.title.clone()).collect();
        let artists: Vec<String> = entries.iter().map(|e| e.artist.clone()).collect();
        let last_week: Vec<Option<i32>> = entries.iter().map(|e| e.last_week).collect();
        let peaks: Vec<Option<i32>> = entries.iter().map(|e| e.peak_position).collect();
        let weeks: Vec<Option<i32>> = entries.iter().map(|e| e.weeks_on_chart).collect();

        let inserted = sqlx::query(
            r#"
            INSERT INTO chart_entries (
                chart_name, chart_date, position, title, artist,
                last_week, peak_position, weeks_on_chart
            )
            SELECT $1::text, $2::date, * FROM UNNEST(
                $3::int4[], $4::text[], $5::text[], $6::int4[], $7::int4[], $8::int4[]
            )
            "#,
        )
        .bind(chart_name)
        .bind(chart_date)
        .bind(&positions)
        .bind(&titles)
        .bind(&artists)
        .bind(&last_week)
        .bind(&peaks)
        .bind(&weeks)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        tracing::debug!(chart_name, deleted, inserted, "Chart replaced");
        Ok(inserted)
    }

    /// Current rows of a chart by position
    #[tracing::instrument(skip(self), fields(db.table = "chart_entries", db.operation = "select"))]
    pub async fn list(&self, chart_name: &str) -> Result<Vec<ChartEntry>, AppError> {
        let entries = sqlx::query_as::<Postgres, ChartEntry>(
            r#"
            SELECT id, chart_name, position, title, artist, last_week, peak_position,
                   weeks_on_chart, chart_date, created_at
            FROM chart_entries
            WHERE chart_name = $1
            ORDER BY position ASC
            "#,
        )
        .bind(chart_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
