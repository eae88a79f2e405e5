//! Error types for the Marquee plugin.
//!
//! This module defines the crate-wide error type [`MarqueeError`] and the
//! [`Result`] alias used by storage, favorites and configuration code. Remote
//! catalog failures have their own taxonomy in [`SearchError`], because they
//! are surfaced to the user as notifications rather than propagated.

use thiserror::Error;

/// The main error type for Marquee operations.
///
/// Most variants carry a description string; I/O and JSON errors convert
/// automatically through `#[from]`.
///
/// # Examples
///
/// ```
/// use marquee::domain::MarqueeError;
///
/// fn validate_id(id: u64) -> Result<(), MarqueeError> {
///     if id == 0 {
///         return Err(MarqueeError::Validation("id must be positive".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_id(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum MarqueeError {
    /// Storage operation failed.
    ///
    /// Raised by key-value backends when a read or write cannot be served,
    /// including a persisted document that cannot be decoded.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller input was rejected before any state change.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// A specialized `Result` type for Marquee operations.
pub type Result<T> = std::result::Result<T, MarqueeError>;

/// Failure of a remote catalog request (search, details, genres).
///
/// The variants follow how the failure is presented: a configuration problem
/// gets a distinct, actionable message and is never retried automatically;
/// everything else is a generic failure the user may retry by resubmitting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The upstream API credential is missing or rejected.
    #[error("TMDB API key not configured: {0}")]
    Configuration(String),

    /// The upstream answered with a non-success status.
    ///
    /// `message` is taken from the structured error body when one was present.
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status code of the response.
        status: u16,
        /// Error message from the body, or a generic fallback.
        message: String,
    },

    /// The request never produced a structured response.
    #[error("network error: {0}")]
    Transport(String),

    /// A success response could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl SearchError {
    /// Returns `true` for the missing/invalid credential condition.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// User-facing message for this failure.
    ///
    /// Upstream errors pass their body message through; transport and decode
    /// failures collapse to a generic retry hint.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(_) => {
                "Set the `api_key` option in the plugin configuration to enable search.".to_string()
            }
            Self::Upstream { message, .. } => message.clone(),
            Self::Transport(_) | Self::Decode(_) => {
                "Something went wrong while searching. Please try again.".to_string()
            }
        }
    }
}
