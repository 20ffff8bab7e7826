//! Domain route groups (public reads, admin).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, patch, post};
use axum::Router;
use std::sync::Arc;

pub fn public_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/videos", API_PREFIX), get(handlers::videos::list_videos))
        .route(
            &format!("{}/videos/{{video_id}}", API_PREFIX),
            get(handlers::videos::get_video),
        )
        .route(
            &format!("{}/channels", API_PREFIX),
            get(handlers::channels::list_channels),
        )
        .route(&format!("{}/chart", API_PREFIX), get(handlers::charts::get_chart))
        .route(&format!("{}/top30", API_PREFIX), get(handlers::top30::get_top30))
        .route(&format!("{}/news", API_PREFIX), get(handlers::news::list_news))
        .route(
            &format!("{}/sync/status", API_PREFIX),
            get(handlers::sync::sync_status),
        )
        .with_state(state)
}

pub fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/admin/channels", API_PREFIX),
            get(handlers::admin_channels::list_all_channels)
                .post(handlers::admin_channels::create_channel),
        )
        .route(
            &format!("{}/admin/channels/{{id}}", API_PREFIX),
            patch(handlers::admin_channels::update_channel)
                .delete(handlers::admin_channels::delete_channel),
        )
        .route(
            &format!("{}/admin/sync/runs", API_PREFIX),
            get(handlers::admin_sync::list_sync_runs),
        )
        .route(
            &format!("{}/admin/sync/{{job}}", API_PREFIX),
            post(handlers::admin_sync::trigger_sync),
        )
        .with_state(state)
}
