use crate::{error::SyncError, jobs::SyncJob, report::SyncReport};
use async_trait::async_trait;
use honkytonk_core::models::{SyncJobKind, SyncStatus};
use honkytonk_db::Top30Repository;
use honkytonk_sources::{normalize_top30, ApifyClient};
use serde_json::json;

/// Replaces the Top-30 list with the latest Apify dataset.
#[derive(Clone)]
pub struct Top30SyncJob {
    client: Option<ApifyClient>,
    top30: Top30Repository,
}

impl Top30SyncJob {
    pub fn new(client: Option<ApifyClient>, top30: Top30Repository) -> Self {
        Self { client, top30 }
    }
}

#[async_trait]
impl SyncJob for Top30SyncJob {
    fn kind(&self) -> SyncJobKind {
        SyncJobKind::Top30
    }

    #[tracing::instrument(skip(self), fields(sync.job = "top30"))]
    async fn run(&self) -> Result<SyncReport, SyncError> {
        let client = self.client.as_ref().ok_or_else(|| {
            SyncError::NotConfigured(
                "APIFY_TOKEN and APIFY_DATASET_ID or APIFY_ACTOR_ID are not set".to_string(),
            )
        })?;

        let items = client.fetch_top30().await?;
        let fetched = items.len();
        let entries = normalize_top30(items);
        if entries.is_empty() {
            tracing::warn!(fetched, "No usable Top-30 rows, keeping the stored list");
            return Err(SyncError::NoData(format!(
                "no usable Top-30 rows in {} dataset items",
                fetched
            )));
        }

        let inserted = self.top30.replace_all(&entries).await? as usize;
        tracing::info!(fetched, inserted, "Top-30 sync finished");

        Ok(SyncReport::new(SyncStatus::Success, fetched, inserted)
            .with_details(json!({ "positions": entries.len() })))
    }
}
