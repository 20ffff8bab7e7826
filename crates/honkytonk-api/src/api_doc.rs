//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::constants::ADMIN_KEY_HEADER;
use crate::error;
use crate::handlers;
use honkytonk_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Honkytonk Hub API",
        version = "0.1.0",
        description = "Country music videos, charts, Top-30 and news aggregated from YouTube, chart pages, Apify and RSS feeds. Public endpoints are read-only; admin endpoints manage channels and trigger syncs. All endpoints are versioned under /api/v1/."
    ),
    paths(
        // Public reads
        handlers::videos::list_videos,
        handlers::videos::get_video,
        handlers::channels::list_channels,
        handlers::charts::get_chart,
        handlers::top30::get_top30,
        handlers::news::list_news,
        handlers::sync::sync_status,
        // Admin
        handlers::admin_channels::list_all_channels,
        handlers::admin_channels::create_channel,
        handlers::admin_channels::update_channel,
        handlers::admin_channels::delete_channel,
        handlers::admin_sync::trigger_sync,
        handlers::admin_sync::list_sync_runs,
    ),
    components(
        schemas(
            models::Video,
            models::Channel,
            models::ChannelCategory,
            models::CreateChannelRequest,
            models::UpdateChannelRequest,
            models::ChartEntry,
            models::Top30Entry,
            models::NewsArticle,
            models::SyncRun,
            models::SyncJobKind,
            models::SyncStatus,
            models::SyncStatusResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "videos", description = "Videos synced from registered YouTube channels"),
        (name = "channels", description = "Registered YouTube channels"),
        (name = "charts", description = "Country singles chart and the Top-30 list"),
        (name = "news", description = "Articles from country music news feeds"),
        (name = "sync", description = "Data freshness"),
        (name = "admin", description = "Channel management and manual sync triggers (admin key required)")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_KEY_HEADER))),
            );
        }
    }
}
