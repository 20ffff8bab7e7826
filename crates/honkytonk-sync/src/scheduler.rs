use crate::runner::SyncRunner;
use honkytonk_core::{config::SyncConfig, models::SyncJobKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Interval per job; `None` disables scheduling for that job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncIntervals {
    pub videos: Option<Duration>,
    pub chart: Option<Duration>,
    pub top30: Option<Duration>,
    pub news: Option<Duration>,
    pub run_on_startup: bool,
}

impl SyncIntervals {
    pub fn from_config(config: &SyncConfig) -> Self {
        let minutes = |m: u64| (m > 0).then(|| Duration::from_secs(m * 60));
        Self {
            videos: minutes(config.videos_interval_mins),
            chart: minutes(config.chart_interval_mins),
            top30: minutes(config.top30_interval_mins),
            news: minutes(config.news_interval_mins),
            run_on_startup: config.sync_on_startup,
        }
    }

    pub fn enabled(&self) -> Vec<(SyncJobKind, Duration)> {
        [
            (SyncJobKind::Videos, self.videos),
            (SyncJobKind::Chart, self.chart),
            (SyncJobKind::Top30, self.top30),
            (SyncJobKind::News, self.news),
        ]
        .into_iter()
        .filter_map(|(kind, every)| every.map(|d| (kind, d)))
        .collect()
    }
}

pub struct SyncScheduler;

impl SyncScheduler {
    /// Spawn one interval loop per enabled job. Returns the handles for shutdown.
    pub fn start(runner: Arc<SyncRunner>, intervals: SyncIntervals) -> Vec<JoinHandle<()>> {
        intervals
            .enabled()
            .into_iter()
            .map(|(kind, every)| {
                let runner = runner.clone();
                let run_on_startup = intervals.run_on_startup;
                tracing::info!(job = %kind, every_secs = every.as_secs(), "Scheduling sync job");

                tokio::spawn(async move {
                    let mut ticker = interval(every);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    if !run_on_startup {
                        // The first tick completes immediately.
                        ticker.tick().await;
                    }

                    loop {
                        ticker.tick().await;
                        match runner.run(kind).await {
                            Ok(run) => {
                                tracing::debug!(job = %kind, status = %run.status, "Scheduled sync done")
                            }
                            Err(e) => {
                                tracing::warn!(job = %kind, error = %e, "Scheduled sync did not run")
                            }
                        }
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync_config(videos: u64, chart: u64, top30: u64, news: u64) -> SyncConfig {
        SyncConfig {
            video_batch_size: 5,
            video_max_age_days: 90,
            news_batch_size: 5,
            news_retention_days: 0,
            videos_interval_mins: videos,
            chart_interval_mins: chart,
            top30_interval_mins: top30,
            news_interval_mins: news,
            sync_on_startup: false,
        }
    }

    #[test]
    fn test_zero_interval_disables_job() {
        let intervals = SyncIntervals::from_config(&sync_config(60, 0, 720, 30));
        let enabled = intervals.enabled();
        assert_eq!(
            enabled,
            vec![
                (SyncJobKind::Videos, Duration::from_secs(3600)),
                (SyncJobKind::Top30, Duration::from_secs(720 * 60)),
                (SyncJobKind::News, Duration::from_secs(1800)),
            ]
        );
        assert!(!intervals.run_on_startup);
    }

    #[test]
    fn test_all_disabled() {
        assert!(SyncIntervals::from_config(&sync_config(0, 0, 0, 0))
            .enabled()
            .is_empty());
    }
}
