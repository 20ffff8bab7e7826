//! Repositories, source clients and the sync runner

use crate::seo::SeoShell;
use crate::state::AppState;
use anyhow::{Context, Result};
use honkytonk_core::Config;
use honkytonk_db::Repositories;
use honkytonk_sources::{build_client, YouTubeApiClient};
use honkytonk_sync::{ChannelRegistry, SyncRunner};
use sqlx::PgPool;
use std::sync::Arc;

pub fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let repos = Repositories::new(pool.clone());

    let runner = SyncRunner::from_config(config, &repos).context("Failed to build sync jobs")?;

    let sources = config.sources();
    let youtube_api = match sources.youtube_api_key.as_deref() {
        Some(key) => {
            let client = build_client(sources.http_timeout_secs)
                .context("Failed to build HTTP client")?;
            Some(YouTubeApiClient::new(
                client,
                &sources.youtube_api_base_url,
                key,
            ))
        }
        None => {
            tracing::info!("YOUTUBE_API_KEY not set - channels can only be added by UC… id");
            None
        }
    };
    let channel_registry = ChannelRegistry::new(repos.channels.clone(), youtube_api);

    let site = config.site();
    let seo = match site.spa_index_path.as_deref() {
        Some(path) => {
            let shell = SeoShell::load(path, &site.site_name, &site.public_site_url)?;
            tracing::info!(index = %path, site_url = %site.public_site_url, "Serving SPA shell with page metadata");
            Some(Arc::new(shell))
        }
        None => None,
    };

    Ok(Arc::new(AppState {
        config: config.clone(),
        pool,
        repos,
        runner: Arc::new(runner),
        channel_registry,
        seo,
    }))
}
