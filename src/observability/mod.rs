//! Observability subsystem for dtbench
//!
//! Structured logging goes through `tracing`. Library code emits typed
//! [`Event`]s as a field; binaries install a subscriber with
//! [`init_logging`]. Logs go to stderr so stdout stays free for command
//! output.

mod events;

pub use events::Event;

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config file sets one
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Observability errors are never fatal to a run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservabilityError {
    #[error("DTB_OBSERVABILITY_FAILED: invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("DTB_OBSERVABILITY_FAILED: {0}")]
    InitFailed(String),
}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Builds the filter: `RUST_LOG` wins, then `fallback`.
pub fn build_filter(fallback: &str) -> ObservabilityResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback).map_err(|e| ObservabilityError::InvalidFilter {
        filter: fallback.to_string(),
        message: e.to_string(),
    })
}

/// Installs the global stderr subscriber.
pub fn init_logging(fallback_filter: &str) -> ObservabilityResult<()> {
    let filter = build_filter(fallback_filter)?;
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| ObservabilityError::InitFailed(e.to_string()))
}
