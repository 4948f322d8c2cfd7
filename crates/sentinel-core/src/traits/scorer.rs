//! Sentiment scorer trait definition.

use crate::error::SentimentError;
use crate::types::SentimentResult;
use async_trait::async_trait;

/// Maps free text to a sentiment label and confidence.
///
/// The model behind a scorer is opaque to the rest of the system.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Classify a piece of text.
    async fn score(&self, text: &str) -> Result<SentimentResult, SentimentError>;

    /// Get the scorer name.
    fn name(&self) -> &str;
}
