//! Per-cycle reports handed to the presentation layer.

use crate::types::{NewsItem, PriceQuote, SentimentResult, Signal};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Timer,
    Manual,
}

/// Everything one poll→fetch→score→decide pass produced.
///
/// A cycle with no new headline has every optional field empty, which keeps it
/// distinguishable from a cycle that decided to hold.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub trigger: TriggerKind,
    pub headline: Option<NewsItem>,
    pub price: Option<PriceQuote>,
    pub sentiment: Option<SentimentResult>,
    pub signal: Option<Signal>,
}

impl CycleReport {
    /// Report for a cycle that found nothing new.
    pub fn empty(trigger: TriggerKind) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            trigger,
            headline: None,
            price: None,
            sentiment: None,
            signal: None,
        }
    }

    pub fn has_news(&self) -> bool {
        self.headline.is_some()
    }

    /// Whether the price behind this cycle was synthetic.
    pub fn is_simulated(&self) -> bool {
        self.price.as_ref().is_some_and(PriceQuote::is_simulated)
    }
}
