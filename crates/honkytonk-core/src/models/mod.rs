//! Domain models shared by the database layer, the sync jobs and the HTTP API.

pub mod channel;
pub mod chart;
pub mod news;
pub mod page;
pub mod sync;
pub mod top30;
pub mod video;

pub use channel::{Channel, ChannelCategory, CreateChannelRequest, UpdateChannelRequest};
pub use chart::{ChartEntry, NewChartEntry};
pub use news::{NewNewsArticle, NewsArticle};
pub use page::{Page, PageQuery};
pub use sync::{NewSyncRun, SyncJobKind, SyncRun, SyncStatus, SyncStatusResponse};
pub use top30::{NewTop30Entry, Top30Entry};
pub use video::{NewVideo, Video};
