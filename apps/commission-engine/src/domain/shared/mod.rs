//! Shared Kernel
//!
//! Types used across every bounded context.

pub mod errors;
pub mod identifiers;
pub mod rounding;

pub use errors::DomainError;
pub use identifiers::{
    AccountId, AssetId, AssetPairId, OperationId, OrderId, PositionId, SubOperationId,
    TradingConditionId,
};
pub use rounding::round_to_accuracy;
