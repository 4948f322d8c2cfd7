//! Configuration structures.

use sentinel_core::error::SentinelError;
use sentinel_engine::DecisionConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub price: PriceSettings,
    #[serde(default)]
    pub news: NewsSettings,
    #[serde(default)]
    pub sentiment: SentimentSettings,
    #[serde(default)]
    pub decision: DecisionConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorSettings,
}

impl AppConfig {
    /// Startup checks. Any failure here aborts the process before the first cycle.
    ///
    /// `require_news` makes the news credential mandatory; the interactive mode
    /// can run on typed headlines alone.
    pub fn validate(&self, require_news: bool) -> Result<(), SentinelError> {
        self.decision.validate()?;
        self.price.validate()?;
        self.orchestrator.validate()?;

        if require_news && !self.news.enabled {
            return Err(SentinelError::Config(
                "news polling is disabled but this mode needs a news feed".into(),
            ));
        }
        if require_news {
            self.news.auth_token()?;
        }
        if self.sentiment.provider == SentimentProvider::HuggingFace {
            self.sentiment.api_token()?;
        }
        Ok(())
    }
}

fn secret(var: &str) -> Result<String, SentinelError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SentinelError::Config(format!("{} not set", var))),
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "sentinel".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Price chain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSettings {
    pub symbol: String,
    pub base_url: String,
    pub primary_attempts: u32,
    pub primary_backoff_ms: u64,
    pub primary_timeout_ms: u64,
    pub fallback_timeout_ms: u64,
    pub simulated_min: f64,
    pub simulated_max: f64,
}

impl Default for PriceSettings {
    fn default() -> Self {
        Self {
            symbol: "BTC/USDT".to_string(),
            base_url: "https://api.binance.com".to_string(),
            primary_attempts: 3,
            primary_backoff_ms: 1000,
            primary_timeout_ms: 5000,
            fallback_timeout_ms: 10_000,
            simulated_min: 20_000.0,
            simulated_max: 105_000.0,
        }
    }
}

impl PriceSettings {
    pub fn primary_backoff(&self) -> Duration {
        Duration::from_millis(self.primary_backoff_ms)
    }

    pub fn primary_timeout(&self) -> Duration {
        Duration::from_millis(self.primary_timeout_ms)
    }

    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }

    fn validate(&self) -> Result<(), SentinelError> {
        if self.symbol.trim().is_empty() {
            return Err(SentinelError::Config("price.symbol is empty".into()));
        }
        if self.primary_attempts == 0 {
            return Err(SentinelError::Config("price.primary_attempts must be at least 1".into()));
        }
        let (min, max) = (self.simulated_min, self.simulated_max);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(SentinelError::Config(format!(
                "simulated price range [{}, {}] is invalid",
                min, max
            )));
        }
        Ok(())
    }
}

/// News polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    pub enabled: bool,
    pub url: String,
    /// Name of the environment variable holding the API token.
    pub auth_token_env: String,
    pub currencies: String,
    pub filter: String,
    pub kind: String,
    pub timeout_ms: u64,
    /// Retry through the blocking transport when the async one fails.
    pub blocking_fallback: bool,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://cryptopanic.com/api/v1/posts/".to_string(),
            auth_token_env: "CRYPTOPANIC_AUTH_TOKEN".to_string(),
            currencies: "BTC".to_string(),
            filter: "important".to_string(),
            kind: "news".to_string(),
            timeout_ms: 10_000,
            blocking_fallback: true,
        }
    }
}

impl NewsSettings {
    pub fn auth_token(&self) -> Result<String, SentinelError> {
        secret(&self.auth_token_env)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Which sentiment adapter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentProvider {
    /// Keyword scorer, no network
    #[default]
    Lexicon,
    /// Hosted inference API
    HuggingFace,
}

/// Sentiment scorer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentSettings {
    pub provider: SentimentProvider,
    pub base_url: String,
    pub model: String,
    pub api_token_env: String,
    pub timeout_ms: u64,
}

impl Default for SentimentSettings {
    fn default() -> Self {
        Self {
            provider: SentimentProvider::Lexicon,
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            model: "mrm8488/distilroberta-finetuned-financial-news-sentiment-analysis".to_string(),
            api_token_env: "HF_API_TOKEN".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl SentimentSettings {
    pub fn api_token(&self) -> Result<String, SentinelError> {
        secret(&self.api_token_env)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Cycle scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorSettings {
    pub poll_interval_secs: u64,
    /// Upper bound on timer ticks skipped after consecutive empty polls.
    pub max_idle_skips: u32,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            max_idle_skips: 3,
        }
    }
}

impl OrchestratorSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    fn validate(&self) -> Result<(), SentinelError> {
        if self.poll_interval_secs == 0 {
            return Err(SentinelError::Config(
                "orchestrator.poll_interval_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
