//! Logging setup and cycle report presentation.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{ReportFormat, ReportPrinter};
