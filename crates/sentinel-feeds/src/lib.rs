//! Price, news, and sentiment data sources.
//!
//! Every network call in this crate is bounded by a per-request timeout, and no
//! feed error escapes [`PriceFeed::get`] or [`NewsFeed::poll`].

mod http;
mod news;
mod price;
mod retry;
mod sentiment;

pub use news::{
    CryptoPanicBlockingClient, CryptoPanicClient, DedupState, NewsFeed, NewsQuery,
    DEFAULT_POSTS_URL as CRYPTOPANIC_POSTS_URL,
};
pub use price::{
    BinanceRestPrice, BinanceTicker, PriceFeed, PriceRange, SimulatedPrice, TierEntry,
    DEFAULT_BASE_URL as BINANCE_BASE_URL,
};
pub use retry::RetryPolicy;
pub use sentiment::{HuggingFaceScorer, LexiconScorer, DEFAULT_INFERENCE_URL, DEFAULT_MODEL};
