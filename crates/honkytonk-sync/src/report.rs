use chrono::{DateTime, Utc};
use honkytonk_core::models::{NewSyncRun, SyncJobKind, SyncStatus};
use serde_json::Value;

/// What a job did, before it is stored as a `SyncRun`.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub items_fetched: usize,
    pub items_inserted: usize,
    pub error: Option<String>,
    pub details: Value,
}

impl SyncReport {
    pub fn new(status: SyncStatus, items_fetched: usize, items_inserted: usize) -> Self {
        Self {
            status,
            items_fetched,
            items_inserted,
            error: None,
            details: Value::Object(Default::default()),
        }
    }

    pub fn empty() -> Self {
        Self::new(SyncStatus::Success, 0, 0)
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn items_skipped(&self) -> usize {
        self.items_fetched.saturating_sub(self.items_inserted)
    }

    pub fn into_run(self, job: SyncJobKind, started_at: DateTime<Utc>) -> NewSyncRun {
        NewSyncRun {
            job,
            status: self.status,
            items_fetched: clamp_count(self.items_fetched),
            items_inserted: clamp_count(self.items_inserted),
            items_skipped: clamp_count(self.items_skipped()),
            error: self.error,
            details: self.details,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

fn clamp_count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
