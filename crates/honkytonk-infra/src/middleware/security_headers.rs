use axum::extract::State;
use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};

/// Allows the SPA to embed YouTube players and the docs page to load RapiDoc.
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self' https://unpkg.com; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data: https:; \
     font-src 'self' data: https:; \
     frame-src https://www.youtube.com https://www.youtube-nocookie.com; \
     connect-src 'self'";

/// Security header settings, passed as middleware state.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecurityHeaders {
    /// Send `Strict-Transport-Security` (production only)
    pub hsts: bool,
}

impl SecurityHeaders {
    pub fn for_environment(is_production: bool) -> Self {
        Self {
            hsts: is_production,
        }
    }
}

/// Use with `axum::middleware::from_fn_with_state(SecurityHeaders { .. }, security_headers_middleware)`.
pub async fn security_headers_middleware(
    State(settings): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    if settings.hsts {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use axum_test::TestServer;

    fn app(settings: SecurityHeaders) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                settings,
                security_headers_middleware,
            ))
    }

    #[tokio::test]
    async fn test_headers_present_without_hsts_in_development() {
        let server = TestServer::new(app(SecurityHeaders::for_environment(false))).unwrap();
        let response = server.get("/").await;
        assert_eq!(response.header("X-Content-Type-Options"), "nosniff");
        assert!(response
            .header("Content-Security-Policy")
            .to_str()
            .unwrap()
            .contains("youtube-nocookie.com"));
        assert!(response.maybe_header("Strict-Transport-Security").is_none());
    }

    #[tokio::test]
    async fn test_hsts_in_production() {
        let server = TestServer::new(app(SecurityHeaders::for_environment(true))).unwrap();
        let response = server.get("/").await;
        assert!(response.maybe_header("Strict-Transport-Security").is_some());
    }
}
