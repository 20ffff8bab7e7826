//! Admin authentication.
//!
//! Admin routes accept the shared key either as `X-Admin-Key: <key>` or as
//! `Authorization: Bearer <key>`. Keys are compared in constant time.

use crate::constants::ADMIN_KEY_HEADER;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use honkytonk_core::AppError;
use std::sync::Arc;
use subtle::ConstantTimeEq;

#[derive(Clone)]
pub struct AdminAuthState {
    /// `None` locks every admin route
    pub admin_api_key: Option<String>,
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// The key presented by the caller, if any. `X-Admin-Key` wins over `Authorization`.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        return Some(key);
    }

    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|k| !k.is_empty())
}

pub async fn admin_auth_middleware(
    State(auth): State<Arc<AdminAuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = auth.admin_api_key.as_deref() else {
        tracing::warn!(path = %request.uri().path(), "Admin route called but ADMIN_API_KEY is not set");
        return HttpAppError(AppError::Unauthorized(
            "Admin API is disabled".to_string(),
        ))
        .into_response();
    };

    match presented_key(request.headers()) {
        Some(key) if secure_compare(key, expected) => next.run(request).await,
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "Rejected admin request with invalid key");
            HttpAppError(AppError::Unauthorized("Invalid admin key".to_string())).into_response()
        }
        None => HttpAppError(AppError::Unauthorized(
            "Missing admin key".to_string(),
        ))
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    const KEY: &str = "test-admin-key-0123456789abcdef";

    fn server(admin_api_key: Option<&str>) -> TestServer {
        let state = Arc::new(AdminAuthState {
            admin_api_key: admin_api_key.map(String::from),
        });
        let app = Router::new()
            .route("/admin", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(state, admin_auth_middleware));
        TestServer::new(app).unwrap()
    }

    #[test]
    fn test_secure_compare() {
        assert!(secure_compare(KEY, KEY));
        assert!(!secure_compare(KEY, "test-admin-key-0123456789abcdeX"));
        assert!(!secure_compare(KEY, "short"));
    }

    #[tokio::test]
    async fn test_admin_key_header_accepted() {
        let response = server(Some(KEY))
            .get("/admin")
            .add_header(ADMIN_KEY_HEADER, KEY)
            .await;
        assert_eq!(response.status_code(), 200);
    }

    #[tokio::test]
    async fn test_bearer_token_accepted() {
        let response = server(Some(KEY))
            .get("/admin")
            .add_header("Authorization", format!("Bearer {}", KEY))
            .await;
        assert_eq!(response.status_code(), 200);
    }

    #[tokio::test]
    async fn test_missing_or_wrong_key_rejected() {
        let server = server(Some(KEY));
        assert_eq!(server.get("/admin").await.status_code(), 401);

        let response = server
            .get("/admin")
            .add_header(ADMIN_KEY_HEADER, "wrong-key")
            .await;
        assert_eq!(response.status_code(), 401);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_admin_disabled_without_configured_key() {
        let response = server(None)
            .get("/admin")
            .add_header(ADMIN_KEY_HEADER, KEY)
            .await;
        assert_eq!(response.status_code(), 401);
    }
}
