//! Error types for page text operations
//!
//! Every failure that reaches a request boundary carries a distinguishing
//! kind plus a human-readable detail. An already-known URL is not an error:
//! it is reported as a successful skip outcome by the service layer.

use thiserror::Error;

/// Result type alias for page text operations
pub type PageTextResult<T> = Result<T, PageTextError>;

/// Error types for page text operations
#[derive(Debug, Error)]
pub enum PageTextError {
    /// Missing or malformed input, correctable by the caller
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Requested resource does not exist (unknown site profile)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Browser engine could not provide a session
    #[error("Failed to acquire browser session: {0}")]
    Session(String),

    /// Both navigation strategies failed
    #[error("Navigation to {url} failed: {primary}; fallback: {fallback}")]
    Navigation {
        url: String,
        primary: String,
        fallback: String,
    },

    /// Page was reachable but its title or content could not be read
    #[error("Failed to read content from {url}: {message}")]
    Extraction { url: String, message: String },

    /// History persistence failure
    #[error("History storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification used to map errors onto responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Upstream,
    Storage,
    Config,
}

impl PageTextError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Session(_) | Self::Navigation { .. } | Self::Extraction { .. } => {
                ErrorKind::Upstream
            }
            Self::Storage(_) => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Check if the caller may simply retry the same request
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Upstream
    }

    pub(crate) fn extraction(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Extraction {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
