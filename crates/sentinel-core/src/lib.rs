//! Core types and traits for the sentiment signal loop.
//!
//! This crate provides the foundational building blocks including:
//! - Price quotes tagged with the tier that produced them
//! - News items and sentiment results
//! - Trading signals and per-cycle reports
//! - Core traits for price tiers, news sources, and sentiment scorers

pub mod types;
pub mod traits;
pub mod error;

pub use error::{SentinelError, SentinelResult};
pub use types::*;
pub use traits::*;
