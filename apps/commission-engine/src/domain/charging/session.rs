//! Tracking session state machine.
//!
//! ```text
//! Created ──start──► Awaiting ──last confirmation / expire──► Completed
//!    └──────start with nothing to await──────────────────────────┘
//! ```
//!
//! The session is plain data; the charging tracker drives it from a single
//! task so no locking is needed here.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::operations::OperationKind;
use crate::domain::shared::{OperationId, SubOperationId};

/// Lifecycle state of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Registered, not yet started.
    Created,
    /// Waiting for confirmations.
    Awaiting,
    /// Summary emitted. Terminal.
    Completed,
}

/// Final accounting of one operation's charging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargingSummary {
    /// Operation the summary belongs to.
    pub operation_id: OperationId,
    /// Operation kind.
    pub kind: OperationKind,
    /// All items of the operation, including calculation failures.
    pub total: usize,
    /// Calculation failures plus failed charges.
    pub failed: usize,
    /// Tracked items that were never confirmed.
    pub unconfirmed: usize,
    /// True when the summary was forced by the timeout.
    pub timed_out: bool,
}

/// Result of feeding one confirmation into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Id is not part of this session, or the session is not awaiting.
    Ignored,
    /// Id was already confirmed; the first confirmation stands.
    Duplicate,
    /// Recorded; more confirmations are outstanding.
    Recorded {
        /// Confirmations still expected.
        remaining: usize,
    },
    /// Recorded the last expected confirmation.
    Completed(ChargingSummary),
}

/// Charging state of one operation.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    operation_id: OperationId,
    kind: OperationKind,
    total_items: usize,
    calculation_failures: usize,
    expected: HashSet<SubOperationId>,
    received: HashMap<SubOperationId, bool>,
    state: SessionState,
}

impl TrackingSession {
    /// Create a session awaiting confirmations for `expected`.
    ///
    /// `total_items` counts every calculated item of the operation;
    /// `calculation_failures` of them were never sent for charging.
    #[must_use]
    pub fn new(
        operation_id: OperationId,
        kind: OperationKind,
        total_items: usize,
        calculation_failures: usize,
        expected: impl IntoIterator<Item = SubOperationId>,
    ) -> Self {
        Self {
            operation_id,
            kind,
            total_items,
            calculation_failures,
            expected: expected.into_iter().collect(),
            received: HashMap::new(),
            state: SessionState::Created,
        }
    }

    /// Operation id.
    #[must_use]
    pub const fn operation_id(&self) -> &OperationId {
        &self.operation_id
    }

    /// Operation kind.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Ids this session is waiting for.
    #[must_use]
    pub const fn expected(&self) -> &HashSet<SubOperationId> {
        &self.expected
    }

    /// Confirmations still outstanding.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.expected.len() - self.received.len()
    }

    /// Begin awaiting. Completes immediately when nothing is expected.
    pub fn start(&mut self) -> Option<ChargingSummary> {
        if self.state != SessionState::Created {
            return None;
        }
        self.state = SessionState::Awaiting;
        if self.expected.is_empty() {
            return Some(self.complete(false));
        }
        None
    }

    /// Feed a confirmation.
    pub fn record(&mut self, id: &SubOperationId, succeeded: bool) -> RecordOutcome {
        if self.state != SessionState::Awaiting || !self.expected.contains(id) {
            return RecordOutcome::Ignored;
        }
        if self.received.contains_key(id) {
            return RecordOutcome::Duplicate;
        }
        self.received.insert(id.clone(), succeeded);

        if self.received.len() == self.expected.len() {
            RecordOutcome::Completed(self.complete(false))
        } else {
            RecordOutcome::Recorded {
                remaining: self.remaining(),
            }
        }
    }

    /// Force completion with whatever has been received.
    pub fn expire(&mut self) -> Option<ChargingSummary> {
        if self.state == SessionState::Completed {
            return None;
        }
        Some(self.complete(true))
    }

    fn complete(&mut self, timed_out: bool) -> ChargingSummary {
        self.state = SessionState::Completed;
        let failed_charges = self.received.values().filter(|ok| !**ok).count();
        ChargingSummary {
            operation_id: self.operation_id.clone(),
            kind: self.kind,
            total: self.total_items,
            failed: self.calculation_failures + failed_charges,
            unconfirmed: self.remaining(),
            timed_out,
        }
    }
}
