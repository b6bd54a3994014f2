//! Market Data Adapters
//!
//! In-memory trading platform and quote sources.

mod quotes;
mod trading;

pub use quotes::InMemoryQuoteProvider;
pub use trading::InMemoryTradingData;
