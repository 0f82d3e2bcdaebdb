//! Error types for pahe-resolve

use thiserror::Error;

/// Main error type for link resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid link: {0}")]
    InvalidUrl(String),

    #[error("Invalid episode selection: {0}")]
    InvalidRange(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Episode range {start}-{end} is out of bounds for a series with {total} episodes")]
    RangeOutOfBounds { start: u32, end: u32, total: u32 },

    #[error("Request to {url} failed with status {status}")]
    Network { url: String, status: u16 },

    #[error("No mirror candidates found on {0}")]
    NoCandidates(String),

    #[error("Expected pattern missing: {0}")]
    ParseError(String),

    #[error("Gave up on {url} after {attempts} attempts: {last_error}")]
    RetryExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Redirect resolution failed: {0}")]
    Resolution(String),

    #[error("Cipher error: {0}")]
    CipherError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Number parsing error: {0}")]
    ParseIntError(#[from] std::num::ParseIntError),
}

impl ResolveError {
    /// Check if a re-fetch of the same page may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::ParseError(_))
    }

    /// Check if the error was raised before any network I/O
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ResolveError::InvalidUrl(_)
                | ResolveError::InvalidRange(_)
                | ResolveError::Validation(_)
        )
    }
}
