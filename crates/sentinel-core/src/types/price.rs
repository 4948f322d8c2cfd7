//! Price quotes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The tier of the price chain that produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Live exchange ticker
    Primary,
    /// Direct REST price endpoint
    Fallback,
    /// Synthetic value, no market data behind it
    Simulated,
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceSource::Primary => write!(f, "PRIMARY"),
            PriceSource::Fallback => write!(f, "FALLBACK"),
            PriceSource::Simulated => write!(f, "SIMULATED"),
        }
    }
}

/// A single price observation.
///
/// `is_simulated` is derived from `source` on construction and the fields are
/// read-only, so a simulated value can never be passed off as market data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    value: Decimal,
    is_simulated: bool,
    source: PriceSource,
    timestamp: DateTime<Utc>,
}

impl PriceQuote {
    /// Create a quote stamped with the current time.
    pub fn new(value: Decimal, source: PriceSource) -> Self {
        Self::at(value, source, Utc::now())
    }

    /// Create a quote with an explicit timestamp.
    pub fn at(value: Decimal, source: PriceSource, timestamp: DateTime<Utc>) -> Self {
        Self {
            value,
            is_simulated: source == PriceSource::Simulated,
            source,
            timestamp,
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_simulated(&self) -> bool {
        self.is_simulated
    }

    pub fn source(&self) -> PriceSource {
        self.source
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// True for any quote not produced by the primary tier.
    pub fn is_degraded(&self) -> bool {
        self.source != PriceSource::Primary
    }
}
