//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use sentinel_monitor::ReportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(author, version, about = "News-sentiment signal loop")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll news on a timer and emit a signal for every fresh headline
    Run(RunArgs),
    /// Score typed headlines; an empty line polls the news feed
    Interactive(InteractiveArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Poll interval in seconds (overrides the configuration file)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Hide cycles that found no new headline
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(clap::Args)]
pub struct InteractiveArgs {
    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
