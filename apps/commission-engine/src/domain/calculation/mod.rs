//! Calculation
//!
//! Calculation items, the trading snapshots they are computed from, and the
//! pure formulas of each operation kind.

pub mod formulas;
mod history;
mod item;
mod trading;

pub use history::{CalculationHistoryRepository, HistoryError};
pub use item::{
    CalculationItem, ChargeStatus, ItemDetails, ItemError, ItemErrorKind, ItemSubject,
};
pub use trading::{AccountSnapshot, Direction, PositionSnapshot, Quote};
