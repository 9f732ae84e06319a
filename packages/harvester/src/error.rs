//! Typed errors for the harvesting library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Stop conditions (duplicate seen, cap reached) are deliberately *not*
//! errors. The accumulation step reports them through
//! [`crate::pipeline::Admission`] so the traversal loop can return partial
//! results without unwinding.

use thiserror::Error;

/// Errors that can occur while harvesting a source.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Browser session failed
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Listing URL could not be parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// A required field could not be extracted, even via fallback
    #[error("missing required field `{field}` on {url}")]
    MissingField { url: String, field: &'static str },
}

/// Errors raised by the browser-automation session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Navigation to a page failed
    #[error("navigation failed for {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other driver-level failure
    #[error("browser driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for harvest operations.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
