//! Overnight swap engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::{CalculationEngine, CalculationError, ItemContext, ItemInput};
use crate::application::caches::ReferenceCaches;
use crate::application::dto::StartOvernightSwapsProcess;
use crate::application::ports::{QuoteProviderPort, TradingDataPort};
use crate::application::services::{FxConverter, RateResolver};
use crate::domain::calculation::formulas::{self, SwapInputs};
use crate::domain::calculation::{
    CalculationItem, ItemDetails, ItemError, ItemErrorKind, ItemSubject, PositionSnapshot,
};
use crate::domain::operations::OperationKind;

/// Financing swap for every position held overnight.
pub struct OvernightSwapEngine<T: TradingDataPort, Q: QuoteProviderPort> {
    trading: Arc<T>,
    caches: Arc<ReferenceCaches>,
    rates: Arc<RateResolver>,
    fx: Arc<FxConverter<Q>>,
}

impl<T: TradingDataPort, Q: QuoteProviderPort> OvernightSwapEngine<T, Q> {
    /// Create the engine.
    #[must_use]
    pub const fn new(
        trading: Arc<T>,
        caches: Arc<ReferenceCaches>,
        rates: Arc<RateResolver>,
        fx: Arc<FxConverter<Q>>,
    ) -> Self {
        Self {
            trading,
            caches,
            rates,
            fx,
        }
    }

    async fn swap_for(
        &self,
        position: &PositionSnapshot,
        command: &StartOvernightSwapsProcess,
    ) -> Result<(Decimal, ItemDetails), ItemError> {
        position.validate()?;

        let pair = self.caches.asset_pair(&position.asset_pair_id).ok_or_else(|| {
            ItemError::new(
                ItemErrorKind::MissingAssetPair,
                format!("unknown instrument {}", position.asset_pair_id),
            )
        })?;
        let quote = self.fx.quote(&position.asset_pair_id).await?;
        let fx_rate = self
            .fx
            .rate(&pair.quote_asset_id, &position.account_asset_id)
            .await?;

        let resolved = self
            .rates
            .overnight_swap(&position.trading_condition_id, &position.asset_pair_id);
        let financing_rate = formulas::financing_rate(&resolved.rate, position.direction);
        let price = quote.mid();

        let amount = formulas::swap_amount(SwapInputs {
            price,
            volume: position.volume,
            fx_rate,
            financing_rate,
            financing_days: command.number_of_financing_days,
            financing_days_per_year: command.financing_days_per_year,
            accuracy: pair.accuracy,
        })?;

        Ok((
            amount,
            ItemDetails::OvernightSwap {
                price,
                fx_rate,
                financing_rate,
                financing_days: command.number_of_financing_days,
                financing_days_per_year: command.financing_days_per_year,
                rate_source: resolved.source,
            },
        ))
    }
}

#[async_trait]
impl<T: TradingDataPort, Q: QuoteProviderPort> CalculationEngine for OvernightSwapEngine<T, Q> {
    type Command = StartOvernightSwapsProcess;

    async fn calculate(
        &self,
        command: &StartOvernightSwapsProcess,
    ) -> Result<Vec<CalculationItem>, CalculationError> {
        let mut positions = self.trading.open_positions().await?;
        // Positions opened after the run was requested are financed by the next run.
        positions.retain(|p| p.opened_at < command.created_at);
        positions.sort_by(|a, b| a.id.cmp(&b.id));

        let context = ItemContext {
            operation_id: &command.operation_id,
            kind: OperationKind::OvernightSwap,
            trading_day: command.trading_day,
            time: Utc::now(),
        };

        let mut items = Vec::with_capacity(positions.len());
        for (index, position) in positions.iter().enumerate() {
            let outcome = self.swap_for(position, command).await;
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
            financing_days = command.number_of_financing_days,
            "Overnight swaps calculated"
        );
        Ok(items)
    }
}
