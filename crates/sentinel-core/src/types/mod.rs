//! Core data types for the signal loop.

mod news;
mod price;
mod report;
mod sentiment;
mod signal;

pub use news::{NewsId, NewsItem};
pub use price::{PriceQuote, PriceSource};
pub use report::{CycleReport, TriggerKind};
pub use sentiment::{SentimentLabel, SentimentResult};
pub use signal::{Action, Signal};
