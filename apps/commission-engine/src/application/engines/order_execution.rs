//! Order execution commission engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::{CalculationEngine, CalculationError, ItemContext, ItemInput};
use crate::application::caches::ReferenceCaches;
use crate::application::dto::HandleOrderExecutionInternal;
use crate::application::ports::{QuoteProviderPort, TradingDataPort};
use crate::application::services::{FxConverter, RateResolver};
use crate::domain::calculation::{
    AccountSnapshot, CalculationItem, Direction, ItemDetails, ItemError, ItemErrorKind,
    ItemSubject, formulas,
};
use crate::domain::operations::OperationKind;
use crate::domain::shared::round_to_accuracy;

/// Commission for one executed order.
pub struct OrderExecutionEngine<T: TradingDataPort, Q: QuoteProviderPort> {
    trading: Arc<T>,
    caches: Arc<ReferenceCaches>,
    rates: Arc<RateResolver>,
    fx: Arc<FxConverter<Q>>,
}

impl<T: TradingDataPort, Q: QuoteProviderPort> OrderExecutionEngine<T, Q> {
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

    async fn commission_for(
        &self,
        command: &HandleOrderExecutionInternal,
        account: &AccountSnapshot,
    ) -> Result<(Decimal, ItemDetails), ItemError> {
        let pair = self.caches.asset_pair(&command.instrument).ok_or_else(|| {
            ItemError::new(
                ItemErrorKind::MissingAssetPair,
                format!("unknown instrument {}", command.instrument),
            )
        })?;
        let account_asset = self.caches.asset(&account.base_asset_id).ok_or_else(|| {
            ItemError::new(
                ItemErrorKind::MissingAsset,
                format!("unknown asset {}", account.base_asset_id),
            )
        })?;

        let resolved = self
            .rates
            .order_execution(&account.trading_condition_id, &command.instrument);
        let rate = &resolved.rate;

        let quote = self.fx.quote(&command.instrument).await?;
        let to_commission_asset = self
            .fx
            .rate(&pair.quote_asset_id, &rate.commission_asset)
            .await?;
        let notional = command
            .volume
            .abs()
            .checked_mul(quote.mid())
            .and_then(|n| n.checked_mul(to_commission_asset))
            .ok_or_else(|| ItemError::overflow("order notional"))?;

        let commission = formulas::order_commission(rate, notional)?;
        let to_account_asset = self
            .fx
            .rate(&rate.commission_asset, &account.base_asset_id)
            .await?;
        let amount = commission
            .checked_mul(to_account_asset)
            .ok_or_else(|| ItemError::overflow("commission conversion"))?;

        Ok((
            round_to_accuracy(amount, account_asset.accuracy),
            ItemDetails::OrderExecution {
                order_code: command.order_code.clone(),
                notional,
                commission,
                commission_asset: rate.commission_asset.clone(),
                legal_entity: rate.legal_entity.clone(),
                rate_source: resolved.source,
            },
        ))
    }
}

#[async_trait]
impl<T: TradingDataPort, Q: QuoteProviderPort> CalculationEngine for OrderExecutionEngine<T, Q> {
    type Command = HandleOrderExecutionInternal;

    async fn calculate(
        &self,
        command: &HandleOrderExecutionInternal,
    ) -> Result<Vec<CalculationItem>, CalculationError> {
        let account = self
            .trading
            .account(&command.account_id)
            .await?
            .ok_or_else(|| CalculationError::AccountNotFound {
                account_id: command.account_id.clone(),
            })?;

        let context = ItemContext {
            operation_id: &command.operation_id,
            kind: OperationKind::OrderExecution,
            trading_day: command.created_at.date_naive(),
            time: Utc::now(),
        };

        let outcome = self.commission_for(command, &account).await;
        let item = context.item(
            0,
            ItemInput {
                account_id: command.account_id.clone(),
                instrument: command.instrument.clone(),
                direction: Some(Direction::from_signed_volume(command.volume)),
                volume: command.volume,
                subject: ItemSubject::Order(command.order_id.clone()),
            },
            outcome,
        );

        tracing::info!(
            operation_id = %command.operation_id,
            order_id = %command.order_id,
            amount = %item.value,
            success = item.is_success,
            "Order execution commission calculated"
        );
        Ok(vec![item])
    }
}
