//! Operations
//!
//! One operation per accepted command. The registry relies on
//! [`OperationRepository::insert_if_absent`] being atomic to admit each
//! operation id at most once.

mod repository;

pub use repository::{OperationRepository, RegistryError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::OperationId;

/// Type of work an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Overnight financing swap over all open positions.
    OvernightSwap,
    /// Unrealized daily P&L over all open positions.
    DailyPnl,
    /// Commission for one executed order.
    OrderExecution,
    /// Fee for actions taken on behalf of a client.
    OnBehalf,
}

impl OperationKind {
    /// Stable name stored on the operation record.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OvernightSwap => "overnight_swap",
            Self::DailyPnl => "daily_pnl",
            Self::OrderExecution => "order_execution",
            Self::OnBehalf => "on_behalf",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle state of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    /// Accepted and in progress.
    Started,
    /// Charging has completed (or timed out). Terminal.
    Finished,
}

/// Record of an accepted top-level operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation identifier, unique across all kinds.
    pub id: OperationId,
    /// Kind of work.
    pub kind: OperationKind,
    /// The originating command, serialized.
    pub payload: serde_json::Value,
    /// When the operation was accepted.
    pub started_at: DateTime<Utc>,
    /// When the operation finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Lifecycle state.
    pub status: OperationStatus,
}

impl Operation {
    /// Create a freshly started operation.
    #[must_use]
    pub const fn start(
        id: OperationId,
        kind: OperationKind,
        payload: serde_json::Value,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            payload,
            started_at,
            finished_at: None,
            status: OperationStatus::Started,
        }
    }

    /// Move to `Finished`. Returns `false` if already finished.
    pub fn finish(&mut self, at: DateTime<Utc>) -> bool {
        if self.status == OperationStatus::Finished {
            return false;
        }
        self.status = OperationStatus::Finished;
        self.finished_at = Some(at);
        true
    }

    /// True once finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == OperationStatus::Finished
    }
}
