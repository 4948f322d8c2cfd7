//! Error types for the signal loop.

use thiserror::Error;

/// Top-level error.
///
/// At runtime only [`SentinelError::Config`] is fatal, and only at startup. Feed and
/// sentiment errors are absorbed at the component boundaries.
#[derive(Error, Debug)]
pub enum SentinelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Sentiment error: {0}")]
    Sentiment(#[from] SentimentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a single price or news transport attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Blocking worker failed: {0}")]
    Worker(String),
}

impl FeedError {
    /// Whether another attempt against the same endpoint could succeed.
    ///
    /// Malformed payloads are treated like network failures: the upstream may be
    /// mid-deploy or behind a captive portal.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::Connection(_)
            | FeedError::Timeout { .. }
            | FeedError::MalformedResponse(_)
            | FeedError::Worker(_) => true,
            FeedError::Http { status, .. } => matches!(status, 408 | 429 | 500..=599),
        }
    }
}

/// Errors raised by a sentiment scorer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SentimentError {
    #[error("Scorer request failed: {0}")]
    Request(String),

    #[error("Unknown sentiment label: {0}")]
    UnknownLabel(String),

    #[error("Confidence {0} outside [0, 1]")]
    InvalidConfidence(f64),

    #[error("Scorer returned no classification")]
    EmptyResponse,
}

/// Result type alias for fallible operations.
pub type SentinelResult<T> = Result<T, SentinelError>;
