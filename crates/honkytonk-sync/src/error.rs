use honkytonk_core::{models::SyncJobKind, AppError};
use honkytonk_sources::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{0} sync is already running")]
    AlreadyRunning(SyncJobKind),

    #[error("{0}")]
    NotConfigured(String),

    /// The source answered but yielded nothing usable; stored data is left untouched.
    #[error("{0}")]
    NoData(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Database(#[from] AppError),
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::AlreadyRunning(kind) => {
                AppError::Conflict(format!("{} sync is already running", kind))
            }
            SyncError::NotConfigured(msg) => AppError::NotConfigured(msg),
            SyncError::NoData(msg) => AppError::Upstream(msg),
            SyncError::Source(e) => e.into(),
            SyncError::Database(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use honkytonk_core::ErrorMetadata;

    #[test]
    fn test_already_running_maps_to_conflict() {
        let err: AppError = SyncError::AlreadyRunning(SyncJobKind::Videos).into();
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.client_message(), "videos sync is already running");
    }

    #[test]
    fn test_not_configured_maps_to_bad_request() {
        let err: AppError = SyncError::NotConfigured("OPENAI_API_KEY is not set".into()).into();
        assert_eq!(err.http_status_code(), 400);
    }
}
