//! Quote Provider Port (Driven Port)
//!
//! Current bid/ask per instrument.

use async_trait::async_trait;

use crate::domain::calculation::Quote;
use crate::domain::shared::AssetPairId;

/// Quote provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// The quote source could not be reached.
    #[error("Quote provider unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

/// Port for current quotes.
#[async_trait]
pub trait QuoteProviderPort: Send + Sync {
    /// Latest quote for an instrument, `None` when the instrument is not quoted.
    ///
    /// # Errors
    ///
    /// Returns error if the quote source cannot be reached.
    async fn quote(&self, instrument: &AssetPairId) -> Result<Option<Quote>, QuoteError>;
}
