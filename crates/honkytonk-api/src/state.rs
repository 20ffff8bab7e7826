//! Application state shared by every handler.

use crate::seo::SeoShell;
use honkytonk_core::Config;
use honkytonk_db::Repositories;
use honkytonk_sync::{ChannelRegistry, SyncRunner};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub repos: Repositories,
    pub runner: Arc<SyncRunner>,
    pub channel_registry: ChannelRegistry,
    /// Present when `SPA_INDEX_PATH` points at a built frontend
    pub seo: Option<Arc<SeoShell>>,
}

impl AppState {
    /// Chart shown when a request does not name one
    pub fn default_chart_name(&self) -> &str {
        self.config.chart_name()
    }
}
