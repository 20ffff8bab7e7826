//! Sync jobs for Honkytonk Hub
//!
//! One job per external source. Jobs log and skip failing items, never retry, and report
//! what they fetched and wrote; the [`SyncRunner`] records every run in `sync_runs` and
//! refuses to start a job that is already running.

pub mod channels;
pub mod error;
pub mod fanout;
pub mod jobs;
pub mod report;
pub mod runner;
pub mod scheduler;

pub use channels::ChannelRegistry;
pub use error::SyncError;
pub use fanout::{fetch_in_batches, BatchOutcome};
pub use jobs::{ChartSyncJob, NewsSyncJob, SyncJob, Top30SyncJob, VideoSyncJob};
pub use report::SyncReport;
pub use runner::SyncRunner;
pub use scheduler::{SyncIntervals, SyncScheduler};
