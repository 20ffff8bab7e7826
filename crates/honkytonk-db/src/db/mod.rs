//! Database repositories
//!
//! One repository per table. Videos and news are insert-if-absent keyed on their external
//! identifier; charts and the Top-30 list are replaced wholesale inside a transaction.

pub mod channel;
pub mod chart;
pub mod news;
pub mod sync_run;
pub mod top30;
pub mod transaction;
pub mod video;

pub use channel::ChannelRepository;
pub use chart::ChartRepository;
pub use news::NewsRepository;
pub use sync_run::SyncRunRepository;
pub use top30::Top30Repository;
pub use transaction::TransactionGuard;
pub use video::VideoRepository;

use sqlx::PgPool;

/// All repositories over a single pool.
#[derive(Clone)]
pub struct Repositories {
    pub channels: ChannelRepository,
    pub videos: VideoRepository,
    pub charts: ChartRepository,
    pub top30: Top30Repository,
    pub news: NewsRepository,
    pub sync_runs: SyncRunRepository,
}

impl Repositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            channels: ChannelRepository::new(pool.clone()),
            videos: VideoRepository::new(pool.clone()),
            charts: ChartRepository::new(pool.clone()),
            top30: Top30Repository::new(pool.clone()),
            news: NewsRepository::new(pool.clone()),
            sync_runs: SyncRunRepository::new(pool),
        }
    }
}

/// Turn free text into an `ILIKE` pattern matching it anywhere, escaping wildcards.
pub(crate) fn contains_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
