use honkytonk_core::AppError;

/// Errors raised while talking to an upstream source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with {status}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl SourceError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            SourceError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use honkytonk_core::ErrorMetadata;

    #[test]
    fn test_source_errors_map_to_app_errors() {
        let err: AppError = SourceError::Status {
            status: 403,
            url: "https://www.googleapis.com/youtube/v3/channels".to_string(),
            body: "quotaExceeded".to_string(),
        }
        .into();
        assert_eq!(err.http_status_code(), 502);
        assert!(err.client_message().contains("403"));

        let err: AppError = SourceError::NotFound("channel @nobody".to_string()).into();
        assert_eq!(err.http_status_code(), 404);
    }
}
