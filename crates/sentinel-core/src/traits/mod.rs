//! Core traits for the signal loop.

mod news_source;
mod price_tier;
mod scorer;

pub use news_source::NewsSource;
pub use price_tier::PriceTier;
pub use scorer::SentimentScorer;
