//! Persistence Adapters
//!
//! In-memory implementations of the registry, history and reference data
//! repositories. Each can be switched to "unavailable" to exercise the
//! transient-failure paths.

mod history;
mod operations;
mod reference_store;

pub use history::InMemoryCalculationHistory;
pub use operations::InMemoryOperationRepository;
pub use reference_store::InMemoryReferenceStore;
