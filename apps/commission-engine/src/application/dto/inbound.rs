//! Messages consumed from the bus.

use serde::{Deserialize, Serialize};

use super::commands::Command;
use crate::domain::reference::ReferenceDataKind;
use crate::domain::shared::SubOperationId;

/// Any message the engine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message", rename_all = "snake_case")]
pub enum InboundMessage {
    /// A start command.
    Command(Command),
    /// Downstream charged (or failed to charge) one item.
    ChargeConfirmed {
        /// Item id from the per-item event.
        sub_operation_id: SubOperationId,
        /// Whether the charge succeeded.
        succeeded: bool,
    },
    /// Upstream reference data changed.
    ReferenceDataChanged {
        /// What changed.
        kind: ReferenceDataKind,
    },
}

impl From<Command> for InboundMessage {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

impl InboundMessage {
    /// Message type name, used for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::ChargeConfirmed { .. } => "charge_confirmed",
            Self::ReferenceDataChanged { .. } => "reference_data_changed",
        }
    }
}
