use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// The four sync jobs, one per external source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "text", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum SyncJobKind {
    Videos,
    Chart,
    Top30,
    News,
}

impl SyncJobKind {
    pub const ALL: [SyncJobKind; 4] = [
        SyncJobKind::Videos,
        SyncJobKind::Chart,
        SyncJobKind::Top30,
        SyncJobKind::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncJobKind::Videos => "videos",
            SyncJobKind::Chart => "chart",
            SyncJobKind::Top30 => "top30",
            SyncJobKind::News => "news",
        }
    }
}

impl Display for SyncJobKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncJobKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "videos" | "video" => Ok(SyncJobKind::Videos),
            "chart" | "charts" => Ok(SyncJobKind::Chart),
            "top30" | "top-30" => Ok(SyncJobKind::Top30),
            "news" => Ok(SyncJobKind::News),
            _ => Err(anyhow::anyhow!("Invalid sync job: {}", s)),
        }
    }
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "text", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Partial,
    Failed,
}

impl SyncStatus {
    /// Derive the status from how many sources were attempted and how many failed.
    pub fn from_counts(fetched_sources: usize, failed_sources: usize) -> Self {
        if failed_sources == 0 {
            SyncStatus::Success
        } else if failed_sources >= fetched_sources {
            SyncStatus::Failed
        } else {
            SyncStatus::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "success",
            SyncStatus::Partial => "partial",
            SyncStatus::Failed => "failed",
        }
    }
}

impl Display for SyncStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(SyncStatus::Success),
            "partial" => Ok(SyncStatus::Partial),
            "failed" => Ok(SyncStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid sync status: {}", s)),
        }
    }
}

/// One recorded execution of a sync job.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SyncRun {
    pub id: Uuid,
    pub job: SyncJobKind,
    pub status: SyncStatus,
    pub items_fetched: i32,
    pub items_inserted: i32,
    pub items_skipped: i32,
    pub error: Option<String>,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// A finished run ready to be recorded.
#[derive(Debug, Clone)]
pub struct NewSyncRun {
    pub job: SyncJobKind,
    pub status: SyncStatus,
    pub items_fetched: i32,
    pub items_inserted: i32,
    pub items_skipped: i32,
    pub error: Option<String>,
    pub details: serde_json::Value,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Latest run per job. Jobs that never ran are absent from `runs`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SyncStatusResponse {
    pub runs: Vec<SyncRun>,
    /// Jobs with a run in progress on this server.
    #[serde(default)]
    pub running: Vec<SyncJobKind>,
}
