//! Internal error types for upstream HTTP operations.
//!
//! These errors are internal to `modelgate-upstream` and are mapped to the
//! core port errors at the boundary.

use modelgate_core::ports::{CatalogError, CompletionError};
use thiserror::Error;

/// Result type alias for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Errors raised by the reqwest-backed upstream client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl UpstreamError {
    /// Map into the catalog port's error space.
    #[must_use]
    pub fn into_catalog_error(self) -> CatalogError {
        match self {
            Self::Http(error) if error.is_decode() => {
                CatalogError::InvalidResponse(error.to_string())
            }
            Self::Http(error) => CatalogError::Network(error.to_string()),
            Self::InvalidUrl(error) => CatalogError::InvalidUrl(error.to_string()),
        }
    }

    /// Map into the completion port's error space.
    #[must_use]
    pub fn into_completion_error(self) -> CompletionError {
        match self {
            Self::Http(error) if error.is_decode() => {
                CompletionError::InvalidResponse(error.to_string())
            }
            Self::Http(error) => CompletionError::Network(error.to_string()),
            Self::InvalidUrl(error) => CompletionError::InvalidUrl(error.to_string()),
        }
    }
}
