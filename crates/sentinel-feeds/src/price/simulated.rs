//! Terminal price tier: a synthetic value in a plausible range.

use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sentinel_core::types::{PriceQuote, PriceSource};

/// Inclusive bounds for simulated prices. Only [`PriceRange::new`] and
/// `Default` build one, so the bounds are always finite, positive and ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    /// Create a range; `None` if the bounds are not finite, positive, and ordered.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: Decimal) -> bool {
        let lo = Decimal::from_f64(self.min).unwrap_or(Decimal::ZERO);
        let hi = Decimal::from_f64(self.max).unwrap_or(Decimal::MAX);
        value >= lo && value <= hi
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 20_000.0,
            max: 105_000.0,
        }
    }
}

/// Produces uniformly distributed prices tagged [`PriceSource::Simulated`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedPrice {
    range: PriceRange,
}

impl SimulatedPrice {
    pub fn new(range: PriceRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> PriceRange {
        self.range
    }

    pub fn quote(&self) -> PriceQuote {
        let raw = rand::thread_rng().gen_range(self.range.min..=self.range.max);
        let value = Decimal::from_f64(raw)
            .map(|d| d.round_dp(2))
            .unwrap_or(dec!(0));

        // Rounding can push a value a hair past either bound.
        let value = self.clamp(value);
        PriceQuote::new(value, PriceSource::Simulated)
    }

    fn clamp(&self, value: Decimal) -> Decimal {
        let lo = Decimal::from_f64(self.range.min).unwrap_or(value);
        let hi = Decimal::from_f64(self.range.max).unwrap_or(value);
        value.max(lo).min(hi)
    }
}
