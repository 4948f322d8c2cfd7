//! Console presentation of cycle reports.

use sentinel_core::types::{CycleReport, TriggerKind};
use std::fmt::Write;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Renders cycle reports to stdout.
#[derive(Debug, Clone, Default)]
pub struct ReportPrinter {
    format: ReportFormat,
    symbol: String,
    show_empty: bool,
}

impl ReportPrinter {
    pub fn new(format: ReportFormat, symbol: impl Into<String>) -> Self {
        Self {
            format,
            symbol: symbol.into(),
            show_empty: true,
        }
    }

    /// Whether to print cycles that found no new headline.
    pub fn with_show_empty(mut self, show: bool) -> Self {
        self.show_empty = show;
        self
    }

    pub fn print(&self, report: &CycleReport) {
        if let Some(rendered) = self.render(report) {
            println!("{}", rendered);
        }
    }

    /// Render a report, or `None` when it should not be shown.
    pub fn render(&self, report: &CycleReport) -> Option<String> {
        if !report.has_news() && !self.show_empty {
            return None;
        }

        match self.format {
            ReportFormat::Json => serde_json::to_string(report).ok(),
            ReportFormat::Text => Some(self.render_text(report)),
        }
    }

    fn render_text(&self, report: &CycleReport) -> String {
        let trigger = match report.trigger {
            TriggerKind::Timer => "timer",
            TriggerKind::Manual => "manual",
        };
        let stamp = report.timestamp.format("%Y-%m-%d %H:%M:%S UTC");

        let Some(item) = &report.headline else {
            return format!("[{}] {} no new headline", trigger, stamp);
        };

        let mut out = String::new();
        let _ = writeln!(out, "═══ Event analysis [{}] {} ═══", trigger, stamp);

        if let Some(price) = &report.price {
            if price.is_simulated() {
                let _ = writeln!(out, "  Price {} (SIMULATED): ${}", self.symbol, price.value());
            } else {
                let _ = writeln!(
                    out,
                    "  Price {} ({}): ${}",
                    self.symbol,
                    price.source().to_string().to_lowercase(),
                    price.value()
                );
            }
        }

        let _ = writeln!(out, "  Headline [{}]: '{}'", item.id, item.headline);

        match &report.sentiment {
            Some(s) => {
                let _ = writeln!(out, "  Sentiment: {} (confidence {:.2})", s.label(), s.confidence());
            }
            None => {
                let _ = writeln!(out, "  Sentiment: unavailable");
            }
        }

        match &report.signal {
            Some(signal) => {
                let _ = write!(out, "  Signal: {} ({})", signal.action, signal.reason);
                if let Some(token) = signal.action.outcome_token() {
                    let _ = write!(
                        out,
                        "\n  [PAPER] {} {} | fill-or-kill | no order sent",
                        signal.action, token
                    );
                }
            }
            None => {
                let _ = write!(out, "  Signal: none");
            }
        }

        out
    }
}
