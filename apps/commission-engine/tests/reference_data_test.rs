//! Reference data change notifications and rate administration.

#![allow(clippy::unwrap_used)]

mod common;

use rust_decimal_macros::dec;

use commission_engine::application::dto::{Command, InboundMessage};
use commission_engine::application::ports::{HandleOutcome, InboundHandlerPort};
use commission_engine::domain::calculation::{
    CalculationHistoryRepository, Direction, ItemDetails, ItemErrorKind,
};
use commission_engine::domain::rates::{OnBehalfRate, OrderExecutionRate, RateSource};
use commission_engine::domain::reference::ReferenceDataKind;
use commission_engine::domain::shared::{
    AssetId, AssetPairId, OperationId, SubOperationId, TradingConditionId,
};

use common::{Harness, account, order_command, pair, position, swaps_command};

fn changed(kind: ReferenceDataKind) -> InboundMessage {
    InboundMessage::ReferenceDataChanged { kind }
}

fn start(command: impl Into<Command>) -> InboundMessage {
    InboundMessage::Command(command.into())
}

fn first_item_id(op: &str) -> SubOperationId {
    SubOperationId::for_item(&OperationId::new(op), 0)
}

#[tokio::test]
async fn asset_pair_change_makes_new_instrument_available() {
    let harness = Harness::new().await;
    harness.trading.set_positions(vec![position("p-1", "XAUUSD", Direction::Long, dec!(1))]);
    harness.quotes.set_quote(AssetPairId::new("XAUUSD"), dec!(1999), dec!(2001));

    harness.router.handle(start(swaps_command("op-1"))).await.unwrap();
    let before = harness.history.get(&first_item_id("op-1")).await.unwrap().unwrap();
    assert!(!before.is_success);
    assert_eq!(before.error.unwrap().kind, ItemErrorKind::MissingAssetPair);

    let generation = harness.container.caches().asset_pair_generation();
    harness.reference.set_asset_pairs(vec![
        pair("EURUSD", 2),
        pair("GBPUSD", 2),
        pair("XAUUSD", 2),
    ]);
    let outcome = harness.router.handle(changed(ReferenceDataKind::Product)).await.unwrap();
    assert_eq!(outcome, HandleOutcome::Acknowledged);
    assert!(harness.container.caches().asset_pair_generation() > generation);

    harness.router.handle(start(swaps_command("op-2"))).await.unwrap();
    let after = harness.history.get(&first_item_id("op-2")).await.unwrap().unwrap();
    assert!(after.is_success);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_generation() {
    let harness = Harness::new().await;
    let caches = harness.container.caches();
    let generation = caches.asset_pair_generation();

    harness.reference.set_available(false);
    let result = harness.router.handle(changed(ReferenceDataKind::AssetPair)).await;

    assert!(result.is_err());
    assert_eq!(caches.asset_pair_generation(), generation);
    assert!(caches.asset_pair(&AssetPairId::new("EURUSD")).is_some());

    harness.reference.set_available(true);
    assert!(harness.router.handle(changed(ReferenceDataKind::AssetPair)).await.is_ok());
}

#[tokio::test]
async fn client_profile_change_reloads_rates() {
    let harness = Harness::new().await;
    harness.reference.set_on_behalf_rates(vec![OnBehalfRate {
        trading_condition_id: Some(TradingConditionId::new("tc-1")),
        commission: dec!(2.5),
        commission_asset: AssetId::new("USD"),
        legal_entity: "LE-1".to_string(),
    }]);

    harness.router.handle(changed(ReferenceDataKind::ClientProfile)).await.unwrap();

    let rates = harness.container.rate_settings().on_behalf_rates();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].commission, dec!(2.5));
}

#[tokio::test]
async fn replaced_rate_table_applies_to_next_calculation() {
    let harness = Harness::new().await;
    harness.trading.add_account(account("acc-1"));

    harness
        .container
        .rate_settings()
        .replace_order_execution_rates(vec![OrderExecutionRate {
            asset_pair_id: AssetPairId::new("EURUSD"),
            trading_condition_id: None,
            commission_cap: dec!(100),
            commission_floor: dec!(5),
            commission_rate: dec!(0.001),
            commission_asset: AssetId::new("USD"),
            legal_entity: "LE-1".to_string(),
        }])
        .await
        .unwrap();

    harness.router.handle(start(order_command("op-1", dec!(-1000)))).await.unwrap();

    let item = harness.history.get(&first_item_id("op-1")).await.unwrap().unwrap();
    assert_eq!(item.value, dec!(5.00));
    match item.details {
        Some(ItemDetails::OrderExecution { rate_source, .. }) => {
            assert_eq!(rate_source, RateSource::InstrumentDefault);
        }
        other => panic!("unexpected details: {other:?}"),
    }
}

#[tokio::test]
async fn replace_fails_when_store_is_down() {
    let harness = Harness::new().await;
    let before = harness.container.rate_settings().order_execution_rates();

    harness.reference.set_available(false);
    let result = harness
        .container
        .rate_settings()
        .replace_order_execution_rates(Vec::new())
        .await;

    assert!(result.is_err());
    assert_eq!(harness.container.rate_settings().order_execution_rates(), before);
}
