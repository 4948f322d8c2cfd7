//! Tiered price acquisition.

mod binance;
mod simulated;

pub use binance::{BinanceRestPrice, BinanceTicker, DEFAULT_BASE_URL};
pub use simulated::{PriceRange, SimulatedPrice};

use crate::retry::RetryPolicy;
use sentinel_core::traits::PriceTier;
use sentinel_core::types::PriceQuote;
use tracing::{debug, info, warn};

/// A tier paired with the retry policy applied to it.
pub struct TierEntry {
    pub tier: Box<dyn PriceTier>,
    pub policy: RetryPolicy,
}

impl TierEntry {
    pub fn new(tier: impl PriceTier + 'static, policy: RetryPolicy) -> Self {
        Self {
            tier: Box::new(tier),
            policy,
        }
    }
}

/// Ordered price chain that always yields a quote.
///
/// Tiers are tried in order, each exhausting its own retry policy before the next
/// one starts. When every tier fails the simulated tier answers.
pub struct PriceFeed {
    symbol: String,
    tiers: Vec<TierEntry>,
    simulated: SimulatedPrice,
}

impl PriceFeed {
    pub fn new(symbol: impl Into<String>, simulated: SimulatedPrice) -> Self {
        Self {
            symbol: symbol.into(),
            tiers: Vec::new(),
            simulated,
        }
    }

    /// Append a tier to the end of the chain.
    pub fn with_tier(mut self, tier: impl PriceTier + 'static, policy: RetryPolicy) -> Self {
        self.tiers.push(TierEntry::new(tier, policy));
        self
    }

    /// Binance ticker with retries, then the REST endpoint once, then simulation.
    pub fn binance(
        symbol: impl Into<String>,
        primary: BinanceTicker,
        primary_policy: RetryPolicy,
        fallback: BinanceRestPrice,
        simulated: SimulatedPrice,
    ) -> Self {
        Self::new(symbol, simulated)
            .with_tier(primary, primary_policy)
            .with_tier(fallback, RetryPolicy::once())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.tier.name()).collect()
    }

    /// Get the current price. Never fails.
    pub async fn get(&self) -> PriceQuote {
        for (index, entry) in self.tiers.iter().enumerate() {
            let label = format!("{} price for {}", entry.tier.name(), self.symbol);
            match entry.policy.run(&label, || entry.tier.fetch(&self.symbol)).await {
                Ok(value) => {
                    if index > 0 {
                        info!(
                            "Price fallback succeeded via {}: {} = {}",
                            entry.tier.name(),
                            self.symbol,
                            value
                        );
                    } else {
                        debug!("Price via {}: {} = {}", entry.tier.name(), self.symbol, value);
                    }
                    return PriceQuote::new(value, entry.tier.source());
                }
                Err(e) => {
                    warn!("Price tier {} exhausted: {}", entry.tier.name(), e);
                }
            }
        }

        let quote = self.simulated.quote();
        warn!(
            "All price tiers failed for {}; using simulated price {}",
            self.symbol,
            quote.value()
        );
        quote
    }
}
