use crate::{
    error::SyncError,
    fanout::fetch_in_batches,
    jobs::{window_start, SyncJob},
    report::SyncReport,
};
use async_trait::async_trait;
use honkytonk_core::models::{NewNewsArticle, SyncJobKind, SyncStatus};
use honkytonk_db::NewsRepository;
use honkytonk_sources::NewsFeedClient;
use serde_json::json;
use std::collections::HashSet;

/// Pulls every configured news feed and inserts articles whose URL is new.
#[derive(Clone)]
pub struct NewsSyncJob {
    client: NewsFeedClient,
    news: NewsRepository,
    feed_urls: Vec<String>,
    batch_size: usize,
    retention_days: i64,
}

impl NewsSyncJob {
    pub fn new(
        client: NewsFeedClient,
        news: NewsRepository,
        feed_urls: Vec<String>,
        batch_size: usize,
        retention_days: i64,
    ) -> Self {
        Self {
            client,
            news,
            feed_urls,
            batch_size,
            retention_days,
        }
    }
}

#[async_trait]
impl SyncJob for NewsSyncJob {
    fn kind(&self) -> SyncJobKind {
        SyncJobKind::News
    }

    #[tracing::instrument(skip(self), fields(sync.job = "news", feeds = self.feed_urls.len()))]
    async fn run(&self) -> Result<SyncReport, SyncError> {
        if self.feed_urls.is_empty() {
            tracing::info!("No news feeds configured, nothing to sync");
            return Ok(SyncReport::empty().with_details(json!({ "feeds": 0 })));
        }
        let prune_before = window_start(self.retention_days, "NEWS_RETENTION_DAYS")?;

        let outcome = fetch_in_batches(self.feed_urls.clone(), self.batch_size, |url: String| {
            let client = &self.client;
            async move { client.fetch(&url).await }
        })
        .await;

        let failed_feeds: Vec<_> = outcome
            .failures
            .iter()
            .map(|(url, error)| {
                tracing::warn!(feed = %url, error = %error, "News feed failed, skipping");
                json!({ "url": url, "status": error.status_code(), "error": error.to_string() })
            })
            .collect();

        let articles = dedupe_articles(outcome.successes.into_iter().flat_map(|(_, feed)| feed.articles));
        let urls: Vec<String> = articles.iter().map(|a| a.url.clone()).collect();
        let existing = self.news.existing_urls(&urls).await?;
        let fetched = articles.len();
        let new_articles: Vec<NewNewsArticle> = articles
            .into_iter()
            .filter(|a| !existing.contains(&a.url))
            .collect();
        let inserted = self.news.insert_many(&new_articles).await? as usize;

        let pruned = if let Some(cutoff) = prune_before {
            match self.news.prune_older_than(cutoff).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to prune old news articles");
                    0
                }
            }
        } else {
            0
        };

        tracing::info!(
            feeds = self.feed_urls.len(),
            failed = failed_feeds.len(),
            fetched,
            inserted,
            pruned,
            "News sync finished"
        );

        let status = SyncStatus::from_counts(self.feed_urls.len(), failed_feeds.len());
        let mut report = SyncReport::new(status, fetched, inserted).with_details(json!({
            "feeds": self.feed_urls.len(),
            "failed_feeds": failed_feeds,
            "already_stored": existing.len(),
            "pruned": pruned,
        }));
        if !failed_feeds.is_empty() {
            report = report.with_error(format!(
                "{} of {} news feeds failed",
                failed_feeds.len(),
                self.feed_urls.len()
            ));
        }
        Ok(report)
    }
}

/// First occurrence of each URL wins.
pub fn dedupe_articles(articles: impl IntoIterator<Item = NewNewsArticle>) -> Vec<NewNewsArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| seen.insert(a.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str, source: &str) -> NewNewsArticle {
        NewNewsArticle {
            url: url.to_string(),
            title: "Headline".to_string(),
            summary: None,
            image_url: None,
            source: source.to_string(),
            published_at: None,
        }
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let articles = dedupe_articles(vec![
            article("https://a.example.com/1", "Feed A"),
            article("https://a.example.com/2", "Feed A"),
            article("https://a.example.com/1", "Feed B"),
        ]);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source, "Feed A");
    }
}
