//! Application Services
//!
//! Long-lived collaborators shared by the use cases: rate resolution, FX
//! conversion, the idempotency registry, reference data loading and the
//! charging tracker.

mod charging_tracker;
mod fx_converter;
mod operation_registry;
mod rate_resolver;
mod reference_data;

pub use charging_tracker::{ChargingTracker, ConfirmOutcome};
pub use fx_converter::FxConverter;
pub use operation_registry::OperationRegistry;
pub use rate_resolver::RateResolver;
pub use reference_data::{RateSettingsService, ReferenceDataService};
