//! Domain Layer
//!
//! Core business rules of the commission engine. Nothing in here performs I/O:
//! repositories are declared as traits and implemented by infrastructure
//! adapters.
//!
//! # Bounded Contexts
//!
//! - `reference`: Asset pairs, assets and reference-data change kinds
//! - `rates`: Scoped rate records and the rate table lookup chain
//! - `operations`: Top-level operation records and their repository
//! - `calculation`: Calculation items, trading snapshots and pure formulas
//! - `charging`: Tracking session state machine and charging summaries
//!
//! # Shared Kernel
//!
//! - `shared`: Identifiers, rounding helpers and domain errors

pub mod calculation;
pub mod charging;
pub mod operations;
pub mod rates;
pub mod reference;
pub mod shared;
