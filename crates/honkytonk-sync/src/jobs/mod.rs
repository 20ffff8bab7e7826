//! The four sync jobs.

use crate::{error::SyncError, report::SyncReport};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use honkytonk_core::models::SyncJobKind;

pub mod chart;
pub mod news;
pub mod top30;
pub mod videos;

pub use chart::ChartSyncJob;
pub use news::NewsSyncJob;
pub use top30::Top30SyncJob;
pub use videos::VideoSyncJob;

/// A job that pulls one source into one table.
#[async_trait]
pub trait SyncJob: Send + Sync {
    fn kind(&self) -> SyncJobKind;

    async fn run(&self) -> Result<SyncReport, SyncError>;
}

/// `now - days`, or `None` when `days` is 0 (window disabled).
pub(crate) fn window_start(days: i64, setting: &str) -> Result<Option<DateTime<Utc>>, SyncError> {
    if days <= 0 {
        return Ok(None);
    }
    Duration::try_days(days)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .map(Some)
        .ok_or_else(|| SyncError::NotConfigured(format!("{} is out of range: {}", setting, days)))
}
