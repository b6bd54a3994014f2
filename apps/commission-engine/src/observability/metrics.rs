//! Prometheus metrics for the commission engine.
//!
//! # Example
//!
//! ```ignore
//! use commission_engine::observability::init_metrics;
//!
//! init_metrics(9090)?;
//! record_operation(OperationKind::DailyPnl, "calculated");
//! ```

use std::net::{Ipv4Addr, SocketAddr};

use ::metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::domain::operations::OperationKind;

/// Initialize the Prometheus metrics exporter on `0.0.0.0:{port}`.
///
/// This starts an HTTP server that exposes metrics at `/metrics`. Must be
/// called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(port: u16) -> Result<(), MetricsError> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(addr = %addr, "Prometheus metrics exporter started");
    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Operation Metrics
// ============================================================================

/// Record the outcome of a start command.
///
/// # Arguments
///
/// * `kind` - Operation kind
/// * `status` - `calculated`, `duplicate`, `rejected` or `start_failed`
pub fn record_operation(kind: OperationKind, status: &str) {
    counter!(
        "operations_total",
        "kind" => kind.name(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record calculated items of one operation.
pub fn record_items(kind: OperationKind, succeeded: usize, failed: usize) {
    counter!("calculation_items_total", "kind" => kind.name(), "result" => "succeeded")
        .increment(succeeded as u64);
    counter!("calculation_items_total", "kind" => kind.name(), "result" => "failed")
        .increment(failed as u64);
}

// ============================================================================
// Charging Metrics
// ============================================================================

/// Record a closed charging session.
pub fn record_charging_completed(kind: OperationKind, timed_out: bool) {
    let outcome = if timed_out { "timed_out" } else { "completed" };
    counter!("charging_sessions_total", "kind" => kind.name(), "outcome" => outcome).increment(1);
}

// ============================================================================
// Messaging Metrics
// ============================================================================

/// Record a message scheduled for redelivery.
pub fn record_redelivery(message: &'static str) {
    counter!("message_redeliveries_total", "message" => message).increment(1);
}

/// Record a message moved to the dead-letter list.
pub fn record_dead_letter(message: &'static str) {
    counter!("message_dead_letters_total", "message" => message).increment(1);
}
