//! Sentiment signal loop CLI application.

mod app;
mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use sentinel_config::load_config;
use sentinel_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    // Setup logging
    let log_level = match cli.log_level {
        Some(cli::LogLevel::Trace) => "trace",
        Some(cli::LogLevel::Debug) => "debug",
        Some(cli::LogLevel::Info) => "info",
        Some(cli::LogLevel::Warn) => "warn",
        Some(cli::LogLevel::Error) => "error",
        None => config.logging.level.as_str(),
    };
    let json = cli.json_logs || config.logging.format.eq_ignore_ascii_case("json");
    let _log_guard = setup_logging(log_level, json, config.logging.file.as_deref().map(Path::new));

    // Execute command
    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, config).await,
        Commands::Interactive(args) => cli::commands::interactive::run(args, config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, config).await,
    }
}
