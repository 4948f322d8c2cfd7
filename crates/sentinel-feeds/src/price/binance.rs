//! Binance spot price tiers.

use crate::http::{get_json, get_json_blocking, run_blocking};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use sentinel_core::error::FeedError;
use sentinel_core::traits::PriceTier;
use sentinel_core::types::PriceSource;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// `BTC/USDT` → `BTCUSDT`.
pub(crate) fn exchange_symbol(pair: &str) -> String {
    pair.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase()
}

fn positive(price: Decimal) -> Result<Decimal, FeedError> {
    if price > Decimal::ZERO {
        Ok(price)
    } else {
        Err(FeedError::MalformedResponse(format!(
            "non-positive price: {}",
            price
        )))
    }
}

#[derive(Debug, Deserialize)]
struct Ticker24h {
    #[serde(rename = "lastPrice")]
    last_price: Decimal,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: Decimal,
}

/// Primary tier: the exchange 24h ticker, read through the async client.
pub struct BinanceTicker {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl BinanceTicker {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl PriceTier for BinanceTicker {
    async fn fetch(&self, symbol: &str) -> Result<Decimal, FeedError> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("symbol", exchange_symbol(symbol))]);

        let ticker: Ticker24h = get_json(request, self.timeout).await?;
        positive(ticker.last_price)
    }

    fn source(&self) -> PriceSource {
        PriceSource::Primary
    }

    fn name(&self) -> &str {
        "binance-ticker"
    }
}

/// Fallback tier: the plain REST price endpoint, read with a blocking client on a
/// blocking worker so a hung connection cannot stall the scheduler.
pub struct BinanceRestPrice {
    base_url: String,
    timeout: Duration,
}

impl BinanceRestPrice {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl PriceTier for BinanceRestPrice {
    async fn fetch(&self, symbol: &str) -> Result<Decimal, FeedError> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let query = vec![("symbol", exchange_symbol(symbol))];
        let timeout = self.timeout;

        let ticker: TickerPrice =
            run_blocking(move || get_json_blocking(&url, &query, timeout)).await?;
        positive(ticker.price)
    }

    fn source(&self) -> PriceSource {
        PriceSource::Fallback
    }

    fn name(&self) -> &str {
        "binance-rest"
    }
}
