//! Sentiment classification results.

use crate::error::SentimentError;
use serde::{Deserialize, Serialize};

/// Sentiment label produced by a scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl std::str::FromStr for SentimentLabel {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            _ => Err(SentimentError::UnknownLabel(s.to_string())),
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "POSITIVE"),
            SentimentLabel::Negative => write!(f, "NEGATIVE"),
            SentimentLabel::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// A label with its confidence in `[0, 1]`. Built only through [`SentimentResult::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    label: SentimentLabel,
    confidence: f64,
}

impl SentimentResult {
    /// Create a result, rejecting confidences outside `[0, 1]`.
    pub fn new(label: SentimentLabel, confidence: f64) -> Result<Self, SentimentError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(SentimentError::InvalidConfidence(confidence));
        }
        Ok(Self { label, confidence })
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}
