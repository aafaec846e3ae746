//! Observability infrastructure for the Slack client.
//!
//! Provides request tracing hooks and logging redaction utilities.

pub mod logging;
pub mod tracing_utils;

pub use logging::*;
pub use tracing_utils::*;
