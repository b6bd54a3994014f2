//! In-memory quote provider.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::application::ports::{QuoteError, QuoteProviderPort};
use crate::domain::calculation::Quote;
use crate::domain::shared::AssetPairId;

/// Latest bid/ask per instrument, set by tests or a feed bridge.
#[derive(Debug, Default)]
pub struct InMemoryQuoteProvider {
    quotes: RwLock<HashMap<AssetPairId, Quote>>,
}

impl InMemoryQuoteProvider {
    /// Create a provider with no quotes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bid/ask for an instrument.
    pub fn set_quote(&self, instrument: AssetPairId, bid: Decimal, ask: Decimal) {
        let quote = Quote::new(instrument.clone(), bid, ask);
        self.quotes.write().insert(instrument, quote);
    }

    /// Remove the quote of an instrument.
    pub fn remove(&self, instrument: &AssetPairId) {
        self.quotes.write().remove(instrument);
    }
}

#[async_trait]
impl QuoteProviderPort for InMemoryQuoteProvider {
    async fn quote(&self, instrument: &AssetPairId) -> Result<Option<Quote>, QuoteError> {
        Ok(self.quotes.read().get(instrument).cloned())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[tokio::test]
    async fn set_and_remove_quote() {
        let provider = InMemoryQuoteProvider::new();
        let id = AssetPairId::new("EURUSD");
        provider.set_quote(id.clone(), dec!(1.1), dec!(1.2));

        let quote = provider.quote(&id).await.unwrap().unwrap();
        assert_eq!(quote.mid(), dec!(1.15));

        provider.remove(&id);
        assert!(provider.quote(&id).await.unwrap().is_none());
    }
}
