use crate::{
    error::SyncError,
    fanout::fetch_in_batches,
    jobs::{window_start, SyncJob},
    report::SyncReport,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use honkytonk_core::models::{Channel, NewVideo, SyncJobKind, SyncStatus};
use honkytonk_db::{ChannelRepository, VideoRepository};
use honkytonk_sources::{FeedVideo, YouTubeApiClient, YouTubeRssClient};
use serde_json::json;
use std::collections::HashSet;

/// Pulls every active channel's RSS feed and inserts uploads not seen before.
#[derive(Clone)]
pub struct VideoSyncJob {
    channels: ChannelRepository,
    videos: VideoRepository,
    rss: YouTubeRssClient,
    api: Option<YouTubeApiClient>,
    batch_size: usize,
    max_age_days: i64,
}

/// Feed videos that survived filtering, with counts of what was filtered out.
#[derive(Debug, Default)]
pub struct Candidates {
    pub videos: Vec<NewVideo>,
    pub shorts: usize,
    pub too_old: usize,
    pub duplicates: usize,
}

impl VideoSyncJob {
    pub fn new(
        channels: ChannelRepository,
        videos: VideoRepository,
        rss: YouTubeRssClient,
        api: Option<YouTubeApiClient>,
        batch_size: usize,
        max_age_days: i64,
    ) -> Self {
        Self {
            channels,
            videos,
            rss,
            api,
            batch_size,
            max_age_days,
        }
    }

    fn cutoff(&self) -> Result<Option<DateTime<Utc>>, SyncError> {
        window_start(self.max_age_days, "VIDEO_MAX_AGE_DAYS")
    }

    async fn enrich_view_counts(&self, videos: &mut [NewVideo]) -> usize {
        let Some(api) = &self.api else {
            return 0;
        };
        if videos.is_empty() {
            return 0;
        }

        let ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
        match api.video_statistics(&ids).await {
            Ok(views) => {
                let mut enriched = 0;
                for video in videos.iter_mut() {
                    if let Some(count) = views.get(&video.video_id) {
                        video.view_count = Some(*count);
                        enriched += 1;
                    }
                }
                enriched
            }
            Err(e) => {
                tracing::warn!(error = %e, "View count enrichment failed, keeping feed counts");
                0
            }
        }
    }
}

#[async_trait]
impl SyncJob for VideoSyncJob {
    fn kind(&self) -> SyncJobKind {
        SyncJobKind::Videos
    }

    #[tracing::instrument(skip(self), fields(sync.job = "videos"))]
    async fn run(&self) -> Result<SyncReport, SyncError> {
        let channels = self.channels.list_active().await?;
        if channels.is_empty() {
            tracing::info!("No active channels, nothing to sync");
            return Ok(SyncReport::empty().with_details(json!({ "channels": 0 })));
        }

        let channel_count = channels.len();
        let outcome = fetch_in_batches(channels, self.batch_size, |channel: Channel| {
            let rss = &self.rss;
            async move { rss.fetch_channel(&channel.channel_id).await }
        })
        .await;

        let failed_channels: Vec<_> = outcome
            .failures
            .iter()
            .map(|(channel, error)| {
                tracing::warn!(
                    channel_id = %channel.channel_id,
                    channel = %channel.name,
                    error = %error,
                    "Channel feed failed, skipping"
                );
                json!({
                    "channel_id": channel.channel_id,
                    "name": channel.name,
                    "status": error.status_code(),
                    "error": error.to_string(),
                })
            })
            .collect();

        let candidates = candidate_videos(outcome.successes, self.cutoff()?);
        let ids: Vec<String> = candidates.videos.iter().map(|v| v.video_id.clone()).collect();
        let existing = self.videos.existing_ids(&ids).await?;

        let fetched = candidates.videos.len();
        let mut new_videos = plan_new_videos(candidates.videos, &existing);
        let enriched = self.enrich_view_counts(&mut new_videos).await;
        let inserted = self.videos.insert_many(&new_videos).await? as usize;

        tracing::info!(
            channels = channel_count,
            failed = failed_channels.len(),
            fetched,
            new = new_videos.len(),
            inserted,
            "Video sync finished"
        );

        let status = SyncStatus::from_counts(channel_count, failed_channels.len());
        let mut report = SyncReport::new(status, fetched, inserted).with_details(json!({
            "channels": channel_count,
            "failed_channels": failed_channels,
            "shorts_filtered": candidates.shorts,
            "too_old": candidates.too_old,
            "duplicates": candidates.duplicates,
            "already_stored": existing.len(),
            "view_counts_enriched": enriched,
        }));
        if !failed_channels.is_empty() {
            report = report.with_error(format!(
                "{} of {} channel feeds failed",
                failed_channels.len(),
                channel_count
            ));
        }
        Ok(report)
    }
}

/// Flatten fetched feeds into insertable videos: Shorts and videos published before `cutoff`
/// are dropped, and a video listed twice keeps its first occurrence.
pub fn candidate_videos(
    feeds: Vec<(Channel, Vec<FeedVideo>)>,
    cutoff: Option<DateTime<Utc>>,
) -> Candidates {
    let mut candidates = Candidates::default();
    let mut seen = HashSet::new();

    for (channel, videos) in feeds {
        for video in videos {
            if video.is_short() {
                candidates.shorts += 1;
                continue;
            }
            if cutoff.is_some_and(|c| video.published_at < c) {
                candidates.too_old += 1;
                continue;
            }
            if !seen.insert(video.video_id.clone()) {
                candidates.duplicates += 1;
                continue;
            }
            candidates.videos.push(NewVideo {
                video_id: video.video_id,
                channel_id: channel.channel_id.clone(),
                channel_name: channel.name.clone(),
                title: video.title,
                description: video.description,
                thumbnail_url: Some(video.thumbnail_url),
                published_at: video.published_at,
                view_count: video.view_count,
            });
        }
    }

    candidates
}

/// Candidates whose video id is not stored yet.
pub fn plan_new_videos(candidates: Vec<NewVideo>, existing_ids: &HashSet<String>) -> Vec<NewVideo> {
    candidates
        .into_iter()
        .filter(|v| !existing_ids.contains(&v.video_id))
        .collect()
}
