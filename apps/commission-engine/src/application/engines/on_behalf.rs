//! On-behalf fee engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::{CalculationEngine, CalculationError, ItemContext, ItemInput};
use crate::application::caches::ReferenceCaches;
use crate::application::dto::HandleOnBehalfInternal;
use crate::application::ports::{QuoteProviderPort, TradingDataPort};
use crate::application::services::{FxConverter, RateResolver};
use crate::domain::calculation::{
    AccountSnapshot, CalculationItem, ItemDetails, ItemError, ItemErrorKind, ItemSubject,
    formulas,
};
use crate::domain::operations::OperationKind;
use crate::domain::shared::round_to_accuracy;

/// Fee for actions taken on behalf of a client on one order.
pub struct OnBehalfEngine<T: TradingDataPort, Q: QuoteProviderPort> {
    trading: Arc<T>,
    caches: Arc<ReferenceCaches>,
    rates: Arc<RateResolver>,
    fx: Arc<FxConverter<Q>>,
}

impl<T: TradingDataPort, Q: QuoteProviderPort> OnBehalfEngine<T, Q> {
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

    async fn fee_for(
        &self,
        command: &HandleOnBehalfInternal,
        account: &AccountSnapshot,
        actions: u32,
    ) -> Result<(Decimal, ItemDetails), ItemError> {
        let account_asset = self.caches.asset(&command.account_asset_id).ok_or_else(|| {
            ItemError::new(
                ItemErrorKind::MissingAsset,
                format!("unknown asset {}", command.account_asset_id),
            )
        })?;

        let resolved = self.rates.on_behalf(&account.trading_condition_id);
        let rate = &resolved.rate;
        let fee = formulas::on_behalf_fee(actions, rate.commission)?;
        let fx_rate = self
            .fx
            .rate(&rate.commission_asset, &command.account_asset_id)
            .await?;
        let amount = fee
            .checked_mul(fx_rate)
            .ok_or_else(|| ItemError::overflow("on-behalf fee conversion"))?;

        Ok((
            round_to_accuracy(amount, account_asset.accuracy),
            ItemDetails::OnBehalf {
                actions,
                commission: rate.commission,
                commission_asset: rate.commission_asset.clone(),
                legal_entity: rate.legal_entity.clone(),
                rate_source: resolved.source,
            },
        ))
    }
}

#[async_trait]
impl<T: TradingDataPort, Q: QuoteProviderPort> CalculationEngine for OnBehalfEngine<T, Q> {
    type Command = HandleOnBehalfInternal;

    async fn calculate(
        &self,
        command: &HandleOnBehalfInternal,
    ) -> Result<Vec<CalculationItem>, CalculationError> {
        let actions = self
            .trading
            .on_behalf_action_count(&command.order_id)
            .await?;
        if actions == 0 {
            tracing::info!(
                operation_id = %command.operation_id,
                order_id = %command.order_id,
                "No on-behalf actions, nothing to charge"
            );
            return Ok(Vec::new());
        }

        let account = self
            .trading
            .account(&command.account_id)
            .await?
            .ok_or_else(|| CalculationError::AccountNotFound {
                account_id: command.account_id.clone(),
            })?;

        let context = ItemContext {
            operation_id: &command.operation_id,
            kind: OperationKind::OnBehalf,
            trading_day: command.trading_day,
            time: Utc::now(),
        };

        let outcome = self.fee_for(command, &account, actions).await;
        let item = context.item(
            0,
            ItemInput {
                account_id: command.account_id.clone(),
                instrument: command.asset_pair_id.clone(),
                direction: None,
                volume: Decimal::from(actions),
                subject: ItemSubject::Order(command.order_id.clone()),
            },
            outcome,
        );

        tracing::info!(
            operation_id = %command.operation_id,
            order_id = %command.order_id,
            actions,
            amount = %item.value,
            "On-behalf fee calculated"
        );
        Ok(vec![item])
    }
}
