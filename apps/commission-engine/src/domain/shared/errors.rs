//! Domain errors for the commission engine.

/// Domain-level errors raised by business rules.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Invalid value for a field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Entity type.
        entity_type: String,
        /// Entity identifier.
        id: String,
    },

    /// Invalid state transition attempted.
    #[error("Invalid state transition for {entity}: {from} -> {to}")]
    InvalidStateTransition {
        /// Entity type (e.g., "Operation").
        entity: String,
        /// Current state.
        from: String,
        /// Attempted state.
        to: String,
    },
}

impl DomainError {
    /// Shorthand for an [`DomainError::InvalidValue`].
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_display() {
        let err = DomainError::invalid("volume", "must be positive");
        assert_eq!(err.to_string(), "Invalid value for 'volume': must be positive");
    }

    #[test]
    fn not_found_display() {
        let err = DomainError::NotFound {
            entity_type: "Account".to_string(),
            id: "acc-1".to_string(),
        };
        assert_eq!(err.to_string(), "Account not found: acc-1");
    }

    #[test]
    fn state_transition_display() {
        let err = DomainError::InvalidStateTransition {
            entity: "ChargeStatus".to_string(),
            from: "Succeeded".to_string(),
            to: "Failed".to_string(),
        };
        assert!(err.to_string().contains("Succeeded -> Failed"));
    }
}
