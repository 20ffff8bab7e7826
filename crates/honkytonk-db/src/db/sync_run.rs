use honkytonk_core::{
    models::{NewSyncRun, SyncJobKind, SyncRun},
    AppError,
};
use sqlx::{PgPool, Postgres};

const SYNC_RUN_COLUMNS: &str = "id, job, status, items_fetched, items_inserted, items_skipped, \
     error, details, started_at, finished_at";

/// Repository for sync run bookkeeping
#[derive(Clone)]
pub struct SyncRunRepository {
    pool: PgPool,
}

impl SyncRunRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, run), fields(db.table = "sync_runs", db.operation = "insert", job = %run.job))]
    pub async fn record(&self, run: &NewSyncRun) -> Result<SyncRun, AppError> {
        let saved = sqlx::query_as::<Postgres, SyncRun>(&format!(
            r#"
            INSERT INTO sync_runs (
                job, status, items_fetched, items_inserted, items_skipped,
                error, details, started_at, finished_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            SYNC_RUN_COLUMNS
        ))
        .bind(run.job)
        .bind(run.status)
        .bind(run.items_fetched)
        .bind(run.items_inserted)
        .bind(run.items_skipped)
        .bind(&run.error)
        .bind(&run.details)
        .bind(run.started_at)
        .bind(run.finished_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// The most recent run of each job
    #[tracing::instrument(skip(self), fields(db.table = "sync_runs", db.operation = "select"))]
    pub async fn latest_per_job(&self) -> Result<Vec<SyncRun>, AppError> {
        let runs = sqlx::query_as::<Postgres, SyncRun>(&format!(
            r#"
            SELECT DISTINCT ON (job) {}
            FROM sync_runs
            ORDER BY job ASC, started_at DESC
            "#,
            SYNC_RUN_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(runs)
    }

    /// Most recent runs first, optionally for one job
    #[tracing::instrument(skip(self), fields(db.table = "sync_runs", db.operation = "select"))]
    pub async fn list(&self, job: Option<SyncJobKind>, limit: i64) -> Result<Vec<SyncRun>, AppError> {
        let runs = sqlx::query_as::<Postgres, SyncRun>(&format!(
            r#"
            SELECT {}
            FROM sync_runs
            WHERE ($1::text IS NULL OR job = $1)
            ORDER BY started_at DESC
            LIMIT $2
            "#,
            SYNC_RUN_COLUMNS
        ))
        .bind(job)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(runs)
    }
}
