//! Wiring from configuration to a ready orchestrator.

use anyhow::Result;
use sentinel_config::{AppConfig, NewsSettings, PriceSettings, SentimentProvider, SentimentSettings};
use sentinel_core::traits::SentimentScorer;
use sentinel_engine::{DecisionEngine, Orchestrator};
use sentinel_feeds::{
    BinanceRestPrice, BinanceTicker, HuggingFaceScorer, LexiconScorer, NewsFeed, NewsQuery,
    PriceFeed, PriceRange, RetryPolicy, SimulatedPrice,
};
use tracing::{info, warn};

/// Build the orchestrator. Call after [`AppConfig::validate`].
pub fn build_orchestrator(config: &AppConfig, require_news: bool) -> Result<Orchestrator> {
    let price = build_price_feed(&config.price)?;
    let news = build_news_feed(&config.news, require_news)?;
    let scorer = build_scorer(&config.sentiment)?;

    info!(
        "Price chain for {}: {} + simulated",
        price.symbol(),
        price.tier_names().join(" -> ")
    );

    Ok(Orchestrator::with_boxed_scorer(
        news,
        price,
        scorer,
        DecisionEngine::new(config.decision),
    )
    .with_max_idle_skips(config.orchestrator.max_idle_skips))
}

fn build_price_feed(settings: &PriceSettings) -> Result<PriceFeed> {
    let range = PriceRange::new(settings.simulated_min, settings.simulated_max).ok_or_else(|| {
        anyhow::anyhow!(
            "invalid simulated price range [{}, {}]",
            settings.simulated_min,
            settings.simulated_max
        )
    })?;

    Ok(PriceFeed::binance(
        settings.symbol.clone(),
        BinanceTicker::new(settings.base_url.clone(), settings.primary_timeout()),
        RetryPolicy::new(settings.primary_attempts, settings.primary_backoff()),
        BinanceRestPrice::new(settings.base_url.clone(), settings.fallback_timeout()),
        SimulatedPrice::new(range),
    ))
}

fn build_news_feed(settings: &NewsSettings, require: bool) -> Result<Option<NewsFeed>> {
    if !settings.enabled {
        info!("News polling disabled");
        return Ok(None);
    }

    let auth_token = match settings.auth_token() {
        Ok(token) => token,
        Err(e) if require => return Err(e.into()),
        Err(e) => {
            warn!("News polling unavailable: {}", e);
            return Ok(None);
        }
    };

    let query = NewsQuery {
        url: settings.url.clone(),
        auth_token,
        currencies: settings.currencies.clone(),
        filter: settings.filter.clone(),
        kind: settings.kind.clone(),
        timeout: settings.timeout(),
    };

    let feed = if settings.blocking_fallback {
        NewsFeed::cryptopanic(query)
    } else {
        NewsFeed::new(sentinel_feeds::CryptoPanicClient::new(query))
    };
    Ok(Some(feed))
}

fn build_scorer(settings: &SentimentSettings) -> Result<Box<dyn SentimentScorer>> {
    let scorer: Box<dyn SentimentScorer> = match settings.provider {
        SentimentProvider::Lexicon => Box::new(LexiconScorer::new()),
        SentimentProvider::HuggingFace => Box::new(HuggingFaceScorer::new(
            &settings.base_url,
            &settings.model,
            settings.api_token()?,
            settings.timeout(),
        )),
    };
    info!("Sentiment scorer: {}", scorer.name());
    Ok(scorer)
}
