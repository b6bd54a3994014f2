//! FX conversion between assets using the asset pair cache and live quotes.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::application::caches::ReferenceCaches;
use crate::application::ports::QuoteProviderPort;
use crate::domain::calculation::{ItemError, ItemErrorKind, Quote};
use crate::domain::shared::{AssetId, AssetPairId};

/// Converts amounts between assets.
pub struct FxConverter<Q: QuoteProviderPort> {
    caches: Arc<ReferenceCaches>,
    quotes: Arc<Q>,
}

impl<Q: QuoteProviderPort> FxConverter<Q> {
    /// Create a converter.
    #[must_use]
    pub const fn new(caches: Arc<ReferenceCaches>, quotes: Arc<Q>) -> Self {
        Self { caches, quotes }
    }

    /// Latest quote for an instrument as an item-level result.
    ///
    /// # Errors
    ///
    /// Returns a `MissingQuote` item error if the instrument is unquoted or
    /// the provider is unavailable.
    pub async fn quote(&self, instrument: &AssetPairId) -> Result<Quote, ItemError> {
        match self.quotes.quote(instrument).await {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => Err(ItemError::new(
                ItemErrorKind::MissingQuote,
                format!("no quote for {instrument}"),
            )),
            Err(e) => Err(ItemError::new(ItemErrorKind::MissingQuote, e.to_string())),
        }
    }

    /// Multiplier converting an amount in `from` into `to`.
    ///
    /// Uses the mid of the `from/to` pair, or the inverse mid of `to/from`.
    ///
    /// # Errors
    ///
    /// Returns a `MissingFxRate` item error when no pair or quote connects the
    /// two assets.
    pub async fn rate(&self, from: &AssetId, to: &AssetId) -> Result<Decimal, ItemError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        if let Some(pair) = self.caches.asset_pair_for(from, to) {
            return self.mid(&pair.id, from, to).await;
        }

        if let Some(pair) = self.caches.asset_pair_for(to, from) {
            let mid = self.mid(&pair.id, from, to).await?;
            return Decimal::ONE.checked_div(mid).ok_or_else(|| {
                ItemError::new(
                    ItemErrorKind::MissingFxRate,
                    format!("cannot invert {} quote {mid}", pair.id),
                )
            });
        }

        Err(ItemError::new(
            ItemErrorKind::MissingFxRate,
            format!("no instrument converts {from} to {to}"),
        ))
    }

    async fn mid(
        &self,
        instrument: &AssetPairId,
        from: &AssetId,
        to: &AssetId,
    ) -> Result<Decimal, ItemError> {
        let quote = self.quote(instrument).await.map_err(|e| {
            ItemError::new(
                ItemErrorKind::MissingFxRate,
                format!("converting {from} to {to}: {}", e.message),
            )
        })?;
        Ok(quote.mid())
    }
}
