//! Strongly-typed identifiers.
//!
//! Every identifier is an opaque string owned by an upstream system; the
//! newtypes keep account, position and operation ids from being swapped.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the identifier is empty or whitespace only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(OperationId, "Identifier of a top-level operation (one command).");
define_id!(
    SubOperationId,
    "Identifier of one calculation item inside an operation."
);
define_id!(AccountId, "Trading account identifier.");
define_id!(AssetId, "Asset (currency) identifier, e.g. `EUR`.");
define_id!(AssetPairId, "Instrument identifier, e.g. `EURUSD`.");
define_id!(PositionId, "Open position identifier.");
define_id!(OrderId, "Executed order identifier.");
define_id!(
    TradingConditionId,
    "Trading condition (client profile) an account is attached to."
);

impl OperationId {
    /// Generate a fresh random operation id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl SubOperationId {
    /// Derive the id of the item at `index` inside `parent`.
    ///
    /// The derivation is deterministic, so redelivered commands map to the
    /// same sub-operation ids.
    #[must_use]
    pub fn for_item(parent: &OperationId, index: usize) -> Self {
        Self(format!("{parent}_{index}"))
    }

    /// Recover the parent operation id from a derived sub-operation id.
    #[must_use]
    pub fn parent(&self) -> Option<OperationId> {
        let (parent, index) = self.0.rsplit_once('_')?;
        if parent.is_empty() || index.parse::<usize>().is_err() {
            return None;
        }
        Some(OperationId::new(parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_operation_id_is_derived_from_parent_and_index() {
        let parent = OperationId::new("swaps-2026-01-16");
        let id = SubOperationId::for_item(&parent, 3);
        assert_eq!(id.as_str(), "swaps-2026-01-16_3");
    }

    #[test]
    fn sub_operation_id_parent_roundtrip() {
        let parent = OperationId::new("op_with_underscores");
        let id = SubOperationId::for_item(&parent, 12);
        assert_eq!(id.parent(), Some(parent));
    }

    #[test]
    fn sub_operation_id_parent_rejects_foreign_ids() {
        assert_eq!(SubOperationId::new("no-index").parent(), None);
        assert_eq!(SubOperationId::new("op_abc").parent(), None);
        assert_eq!(SubOperationId::new("_4").parent(), None);
    }

    #[test]
    fn generated_operation_ids_are_unique() {
        assert_ne!(OperationId::generate(), OperationId::generate());
    }

    #[test]
    fn blank_detection() {
        assert!(AccountId::new("  ").is_blank());
        assert!(!AccountId::new("acc-1").is_blank());
    }

    #[test]
    fn ids_order_lexicographically() {
        let mut ids = vec![PositionId::new("p-2"), PositionId::new("p-1")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "p-1");
    }

    #[test]
    fn serde_is_transparent() {
        let id = AssetPairId::new("EURUSD");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"EURUSD\"");
    }
}
