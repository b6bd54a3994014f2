//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod confirm_charge;
mod refresh_reference_data;
mod route_message;
mod start_operation;

pub use confirm_charge::ConfirmChargeUseCase;
pub use refresh_reference_data::RefreshReferenceDataUseCase;
pub use route_message::{MessageRouter, StartUseCases};
pub use start_operation::StartOperationUseCase;
