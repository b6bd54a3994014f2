//! Rates
//!
//! Commission and financing rates are scoped by trading condition and
//! instrument. A [`RateTable`] answers the lookup chain
//! *exact → instrument default*; the global default from configuration is
//! applied one layer up by the rate resolver.

mod records;
mod table;

pub use records::{OnBehalfRate, OrderExecutionRate, OvernightSwapRate};
pub use table::{RateScope, RateSource, RateTable, ResolvedRate, ScopedRate};
