//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, LoggingConfig, NewsSettings, OrchestratorSettings, PriceSettings,
    SentimentProvider, SentimentSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from an optional file, overridden by `SENTINEL__*` variables.
///
/// Every section has defaults, so a missing file yields the default setup.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("SENTINEL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Render a configuration as TOML.
pub fn to_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}
