//! Charging
//!
//! Correlation of per-item charge confirmations into one summary per
//! operation.

mod session;

pub use session::{ChargingSummary, RecordOutcome, SessionState, TrackingSession};
