//! Route configuration and setup.
//!
//! Domain route groups live in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::api_doc::ApiDoc;
use crate::auth::{admin_auth_middleware, AdminAuthState};
use crate::constants::{MAX_REQUEST_BODY_BYTES, OPENAPI_JSON_PATH};
use crate::state::AppState;
use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use honkytonk_core::Config;
use honkytonk_infra::{request_id_middleware, security_headers_middleware, SecurityHeaders};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AdminAuthState {
        admin_api_key: config.admin_api_key().map(String::from),
    });

    let admin_routes = domains::admin_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(auth_state, admin_auth_middleware),
    );

    let mut app_state_routes = domains::public_routes(state.clone())
        .merge(admin_routes)
        .merge(health_routes(state.clone()))
        .route(
            OPENAPI_JSON_PATH,
            get(|| async { Json(ApiDoc::openapi()) }),
        );

    if state.seo.is_some() {
        app_state_routes = app_state_routes.fallback(crate::seo::spa_fallback);
    }

    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = app_state_routes
        .with_state(state)
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_JSON_PATH).path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            SecurityHeaders::for_environment(config.is_production()),
            security_headers_middleware,
        ));

    Ok(app)
}

fn health_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/health",
            get({
                let state = state.clone();
                move || health::health_check(state.clone())
            }),
        )
        .route(
            "/health/live",
            get({
                let state = state.clone();
                move || health::liveness_check(state.clone())
            }),
        )
        .with_state(state)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                HeaderName::from_static("x-admin-key"),
                HeaderName::from_static("x-request-id"),
            ])
    };
    Ok(cors)
}
