//! Observability module for logging and metrics.
//!
//! Structured logging goes through `tracing`; counters go through the
//! `metrics` facade and are exported by Prometheus when a port is configured.

pub mod metrics;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub use self::metrics::{MetricsError, init_metrics};

/// Error type for logging setup.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// Unknown log format in configuration.
    #[error("unsupported log format: {0}")]
    UnsupportedFormat(String),
    /// A global subscriber was already installed.
    #[error("tracing initialization error: {0}")]
    Installation(String),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error for an unknown format or when a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_current_span(false)
            .try_init(),
        "pretty" => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(env_filter)
            .try_init(),
        other => return Err(TracingError::UnsupportedFormat(other.to_string())),
    };

    result.map_err(|e| TracingError::Installation(e.to_string()))
}
