//! Validate configuration command.

use anyhow::Result;
use sentinel_config::{to_toml, AppConfig};
use std::path::Path;

pub async fn run(config_path: &Path, config: AppConfig) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    if let Err(e) = config.validate(false) {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Symbol: {}", config.price.symbol);
    println!(
        "Simulated range: [{}, {}]",
        config.price.simulated_min, config.price.simulated_max
    );
    println!("Confidence threshold: {}", config.decision.confidence_threshold);
    println!("Poll interval: {}s", config.orchestrator.poll_interval_secs);
    match config.news.auth_token() {
        Ok(_) => println!("News credentials: present"),
        Err(e) => println!("News credentials: missing ({}); only interactive mode will run", e),
    }

    println!();
    println!("Effective configuration:");
    println!("{}", to_toml(&config)?);

    Ok(())
}
