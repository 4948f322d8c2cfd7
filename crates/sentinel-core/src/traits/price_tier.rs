//! Price tier trait definition.

use crate::error::FeedError;
use crate::types::PriceSource;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// One network strategy in the price fallback chain.
///
/// Implementations make a single attempt per call; retries are applied by the
/// chain that owns the tier.
#[async_trait]
pub trait PriceTier: Send + Sync {
    /// Fetch the last traded price for a pair symbol such as `BTC/USDT`.
    async fn fetch(&self, symbol: &str) -> Result<Decimal, FeedError>;

    /// The tag attached to quotes this tier produces.
    fn source(&self) -> PriceSource;

    /// Get the tier name.
    fn name(&self) -> &str;
}
