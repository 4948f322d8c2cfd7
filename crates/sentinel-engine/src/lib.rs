//! Decision engine and cycle orchestration.
//!
//! The [`Orchestrator`] owns the news feed (and with it the dedup state), the
//! price chain, and the scorer, and runs one cycle at a time.

mod decision;
mod orchestrator;
mod trigger;

pub use decision::{DecisionConfig, DecisionEngine};
pub use orchestrator::{Orchestrator, RunStats};
pub use trigger::{spawn_ticker, Trigger};
