// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::cast_possible_truncation
    )
)]

//! Commission Engine - Rust Core Library
//!
//! Calculates and charges trading commissions: overnight swaps, daily P&L,
//! order execution commission and on-behalf fees.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `calculation`: Calculation items, formulas, trading snapshots
//!   - `charging`: Per-operation charging sessions
//!   - `operations`: Operation lifecycle and registry storage
//!   - `rates`: Rate records and scoped lookup tables
//!   - `reference`: Instruments, assets and change notifications
//!
//! - **Application**: Use cases and orchestration
//!   - `caches`: Atomically swapped reference data snapshots
//!   - `engines`: One calculation engine per operation kind
//!   - `services`: Rate resolver, registry, charging tracker
//!   - `use_cases`: Start, confirm and refresh workflows
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: In-memory repositories
//!   - `messaging`: Message bus, dispatcher and event publishers
//!   - `scheduler`: Daily batch triggers
//!   - `config`: Dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading.
pub mod config;

/// Logging and metrics.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::calculation::{CalculationItem, ChargeStatus, Direction, ItemErrorKind};
pub use domain::operations::{Operation, OperationKind, OperationStatus};
pub use domain::shared::{AccountId, AssetId, AssetPairId, OperationId, SubOperationId};

// Application re-exports
pub use application::dto::{Command, CommissionEvent, InboundMessage};
pub use application::ports::{EventPublisherPort, HandleOutcome, HandlerError, InboundHandlerPort};

// Infrastructure re-exports
pub use infrastructure::config::{Container, InMemoryContainer};
pub use infrastructure::messaging::{InMemoryMessageBus, MessageDispatcher};
pub use infrastructure::scheduler::DailyScheduler;
