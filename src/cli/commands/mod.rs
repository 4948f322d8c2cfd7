//! CLI command implementations.

pub mod interactive;
pub mod run;
pub mod validate;
