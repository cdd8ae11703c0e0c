//! Error types for keg-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} unreachable after {attempts} attempt(s): {reason}")]
    Unreachable {
        url:      String,
        attempts: u32,
        reason:   String,
    },

    #[error("{url} returned HTTP {code}")]
    BadStatus { url: String, code: u16 },

    #[error("too many redirects fetching {url} (limit {limit})")]
    TooManyRedirects { url: String, limit: u32 },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("fetch of {url} cancelled")]
    Cancelled { url: String },

    #[error("request to {url} failed: {reason}")]
    Client { url: String, reason: String },
}

/// Failure reported by an [`HttpClient`](crate::HttpClient) implementation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Timeouts and dropped connections are worth another attempt.
    pub fn is_transient(&self) -> bool { matches!(self, Self::Timeout(_) | Self::Connect(_)) }
}

pub type Result<T> = std::result::Result<T, FetchError>;
