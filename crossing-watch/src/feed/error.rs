//! Crossing feed error types.

use crate::domain::CrossingId;

/// Errors that can occur when talking to the crossing feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// No state is recorded for this crossing
    #[error("no state for crossing {0}")]
    NotFound(CrossingId),

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Mock data could not be loaded or was told to fail
    #[error("mock feed error: {message}")]
    Mock { message: String },
}
