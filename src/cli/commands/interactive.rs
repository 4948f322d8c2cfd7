//! Interactive command implementation.

use anyhow::Result;
use sentinel_config::AppConfig;
use sentinel_engine::Trigger;
use sentinel_monitor::ReportPrinter;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::app::build_orchestrator;
use crate::cli::InteractiveArgs;

pub async fn run(args: InteractiveArgs, config: AppConfig) -> Result<()> {
    config.validate(false)?;

    let orchestrator = build_orchestrator(&config, false)?;
    let has_news = orchestrator.has_news_feed();
    let printer = ReportPrinter::new(args.output.into(), config.price.symbol.clone());

    let (trigger_tx, trigger_rx) = mpsc::channel(1);
    let (report_tx, mut report_rx) = mpsc::channel(1);
    let (stop_tx, stop_rx) = watch::channel(false);
    let worker = tokio::spawn(orchestrator.run(trigger_rx, report_tx, stop_rx));

    println!("Ready. Type a headline to score it (e.g. 'Bitcoin ETF denied by SEC').");
    if has_news {
        println!("Press Enter on an empty line to poll the news feed.");
    }
    println!("Type 'exit' to quit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("headline> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        let trigger = if line.is_empty() {
            if !has_news {
                continue;
            }
            Trigger::poll_now()
        } else {
            Trigger::headline(line)
        };

        if trigger_tx.send(trigger).await.is_err() {
            break;
        }
        match report_rx.recv().await {
            Some(report) => printer.print(&report),
            None => break,
        }
    }

    let _ = stop_tx.send(true);
    drop(trigger_tx);
    let stats = worker.await?;
    info!("Processed {} cycle(s)", stats.cycles);
    println!("Bye.");

    Ok(())
}
