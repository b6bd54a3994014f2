//! Daily P&L engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::{CalculationEngine, CalculationError, ItemContext, ItemInput};
use crate::application::caches::ReferenceCaches;
use crate::application::dto::StartDailyPnlProcess;
use crate::application::ports::{QuoteProviderPort, TradingDataPort};
use crate::application::services::FxConverter;
use crate::domain::calculation::{
    CalculationItem, ItemDetails, ItemError, ItemErrorKind, ItemSubject, PositionSnapshot,
    formulas,
};
use crate::domain::operations::OperationKind;

/// Unrealized P&L not yet charged, for every open position.
pub struct DailyPnlEngine<T: TradingDataPort, Q: QuoteProviderPort> {
    trading: Arc<T>,
    caches: Arc<ReferenceCaches>,
    fx: Arc<FxConverter<Q>>,
}

impl<T: TradingDataPort, Q: QuoteProviderPort> DailyPnlEngine<T, Q> {
    /// Create the engine.
    #[must_use]
    pub const fn new(trading: Arc<T>, caches: Arc<ReferenceCaches>, fx: Arc<FxConverter<Q>>) -> Self {
        Self {
            trading,
            caches,
            fx,
        }
    }

    async fn pnl_for(&self, position: &PositionSnapshot) -> Result<(Decimal, ItemDetails), ItemError> {
        position.validate()?;

        let pair = self.caches.asset_pair(&position.asset_pair_id).ok_or_else(|| {
            ItemError::new(
                ItemErrorKind::MissingAssetPair,
                format!("unknown instrument {}", position.asset_pair_id),
            )
        })?;
        let account_asset = self.caches.asset(&position.account_asset_id).ok_or_else(|| {
            ItemError::new(
                ItemErrorKind::MissingAsset,
                format!("unknown asset {}", position.account_asset_id),
            )
        })?;

        let quote = self.fx.quote(&position.asset_pair_id).await?;
        let close_price = quote.close_price(position.direction);
        let fx_rate = self
            .fx
            .rate(&pair.quote_asset_id, &position.account_asset_id)
            .await?;

        let pnl = formulas::daily_pnl(
            position.open_price,
            close_price,
            position.volume,
            position.direction,
            fx_rate,
            position.charged_pnl,
            account_asset.accuracy,
        )?;

        Ok((
            pnl,
            ItemDetails::DailyPnl {
                open_price: position.open_price,
                close_price,
                fx_rate,
                charged_pnl: position.charged_pnl,
            },
        ))
    }
}

#[async_trait]
impl<T: TradingDataPort, Q: QuoteProviderPort> CalculationEngine for DailyPnlEngine<T, Q> {
    type Command = StartDailyPnlProcess;

    async fn calculate(
        &self,
        command: &StartDailyPnlProcess,
    ) -> Result<Vec<CalculationItem>, CalculationError> {
        let mut positions = self.trading.open_positions().await?;
        positions.sort_by(|a, b| a.id.cmp(&b.id));

        let context = ItemContext {
            operation_id: &command.operation_id,
            kind: OperationKind::DailyPnl,
            trading_day: command.trading_day,
            time: Utc::now(),
        };

        let mut items = Vec::with_capacity(positions.len());
        for (index, position) in positions.iter().enumerate() {
            let outcome = self.pnl_for(position).await;
            items.push(context.item(
                index,
                ItemInput {
                    account_id: position.account_id.clone(),
                    instrument: position.asset_pair_id.clone(),
                    direction: Some(position.direction),
                    volume: position.volume,
                    subject: ItemSubject::Position(position.id.clone()),
                },
                outcome,
            ));
        }

        tracing::info!(
            operation_id = %command.operation_id,
            positions = items.len(),
            "Daily P&L calculated"
        );
        Ok(items)
    }
}
