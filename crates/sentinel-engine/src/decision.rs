//! Threshold decision rule.

use sentinel_core::error::SentinelError;
use sentinel_core::types::{PriceQuote, SentimentLabel, SentimentResult, Signal};
use serde::{Deserialize, Serialize};

/// Decision engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Confidence a directional label must strictly exceed to act on.
    pub confidence_threshold: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.85,
        }
    }
}

impl DecisionConfig {
    pub fn validate(&self) -> Result<(), SentinelError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(SentinelError::Config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        Ok(())
    }
}

/// Turns a sentiment result into a signal.
///
/// - Negative above the threshold: sell
/// - Positive above the threshold: buy
/// - Anything else: hold
///
/// The price rides along for downstream sizing and does not affect the rule.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn decide(&self, sentiment: &SentimentResult, _price: &PriceQuote) -> Signal {
        let confident = sentiment.confidence() > self.config.confidence_threshold;

        match sentiment.label() {
            SentimentLabel::Negative if confident => Signal::sell("bearish sentiment"),
            SentimentLabel::Positive if confident => Signal::buy("bullish sentiment"),
            _ => Signal::hold("low confidence or neutral"),
        }
    }
}
