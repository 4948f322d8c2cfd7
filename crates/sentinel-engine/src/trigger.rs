//! Cycle triggers.

use sentinel_core::types::TriggerKind;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// What asks the orchestrator to run a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Periodic timer fire.
    Tick,
    /// Operator command. With a headline, that text is scored directly instead
    /// of polling the news feed.
    Manual { headline: Option<String> },
}

impl Trigger {
    pub fn poll_now() -> Self {
        Trigger::Manual { headline: None }
    }

    pub fn headline(text: impl Into<String>) -> Self {
        Trigger::Manual {
            headline: Some(text.into()),
        }
    }

    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Tick => TriggerKind::Timer,
            Trigger::Manual { .. } => TriggerKind::Manual,
        }
    }

    pub fn is_tick(&self) -> bool {
        matches!(self, Trigger::Tick)
    }
}

/// Send a [`Trigger::Tick`] every `period`, starting immediately.
///
/// Ticks are offered with `try_send`, so when the channel is full the tick is
/// dropped rather than queued. Give the channel a capacity of one to keep at
/// most a single tick pending. The task ends when the receiver is dropped.
pub fn spawn_ticker(period: Duration, tx: mpsc::Sender<Trigger>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;
            match tx.try_send(Trigger::Tick) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => debug!("Tick dropped, cycle still pending"),
                Err(TrySendError::Closed(_)) => break,
            }
        }
    })
}
