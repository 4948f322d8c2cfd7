//! Continuous polling command implementation.

use anyhow::Result;
use sentinel_config::AppConfig;
use sentinel_engine::spawn_ticker;
use sentinel_monitor::ReportPrinter;
use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::app::build_orchestrator;
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, mut config: AppConfig) -> Result<()> {
    if let Some(secs) = args.interval {
        config.orchestrator.poll_interval_secs = secs;
    }
    config.validate(true)?;

    let orchestrator = build_orchestrator(&config, true)?;
    let printer = ReportPrinter::new(args.output.into(), config.price.symbol.clone())
        .with_show_empty(!args.quiet);

    // Capacity one: at most a single tick waits while a cycle runs.
    let (trigger_tx, trigger_rx) = mpsc::channel(1);
    let (report_tx, mut report_rx) = mpsc::channel(16);
    let (stop_tx, stop_rx) = watch::channel(false);

    info!(
        "Polling {} news every {}s",
        config.news.currencies, config.orchestrator.poll_interval_secs
    );
    let ticker = spawn_ticker(config.orchestrator.poll_interval(), trigger_tx);
    let worker = tokio::spawn(orchestrator.run(trigger_rx, report_tx, stop_rx));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, finishing the current cycle");
                let _ = stop_tx.send(true);
                break;
            }
            report = report_rx.recv() => match report {
                Some(report) => printer.print(&report),
                None => break,
            },
        }
    }

    while let Some(report) = report_rx.recv().await {
        printer.print(&report);
    }

    let stats = worker.await?;
    ticker.abort();
    info!(
        "Stopped: {} cycle(s), {} tick(s) dropped while busy, {} skipped while idle",
        stats.cycles, stats.dropped_ticks, stats.skipped_ticks
    );

    Ok(())
}
