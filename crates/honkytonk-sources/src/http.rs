use crate::error::SourceError;
use reqwest::{Client, Response};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("HonkytonkHub/", env!("CARGO_PKG_VERSION"));

/// Sent when scraping pages that reject non-browser clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Shared HTTP client for all sources.
pub fn build_client(timeout_secs: u64) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Pass 2xx responses through; turn anything else into `SourceError::Status` carrying the
/// start of the body.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(SourceError::Status {
        status: status.as_u16(),
        url,
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}
