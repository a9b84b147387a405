//! Errors surfaced to callers of the service operations.
//!
//! Load-time and sync-time problems never show up here: the loader and the reload
//! coordinator absorb them and log. What remains are conditions a caller has to tell
//! apart (a timed-out search is not an empty search, a bad platform is the client's
//! fault, a missing file is not a server fault).

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Search timeout after {}ms", elapsed.as_millis())]
    SearchTimeout { elapsed: Duration },

    #[error("Invalid platform: {0}")]
    InvalidPlatform(String),

    #[error("Lyric file not found: {platform}/{id}.{format}")]
    NotFound { platform: String, id: String, format: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Git sync is disabled by server configuration")]
    SyncDisabled,

    #[error("Download API is disabled by server configuration")]
    DownloadDisabled,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Stable machine-readable label
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::SearchTimeout { .. } => "search_timeout",
            ServiceError::InvalidPlatform(_) => "invalid_platform",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::InvalidRequest(_) => "invalid_request",
            ServiceError::SyncDisabled => "sync_disabled",
            ServiceError::DownloadDisabled => "download_disabled",
            ServiceError::Internal(_) => "internal",
        }
    }

    /// True for errors caused by the request rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidPlatform(_)
                | ServiceError::NotFound { .. }
                | ServiceError::InvalidRequest(_)
        )
    }
}
