//! Calculation engine tests against in-memory trading and reference data.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_case::test_case;

use commission_engine::application::caches::ReferenceCaches;
use commission_engine::application::engines::{
    CalculationEngine, CalculationError, DailyPnlEngine, OnBehalfEngine, OrderExecutionEngine,
    OvernightSwapEngine,
};
use commission_engine::application::services::{FxConverter, RateResolver, ReferenceDataService};
use commission_engine::config::DefaultRatesConfig;
use commission_engine::domain::calculation::{
    CalculationItem, Direction, ItemDetails, ItemErrorKind, ItemSubject,
};
use commission_engine::domain::rates::RateSource;
use commission_engine::domain::shared::{AccountId, AssetId, AssetPairId, OrderId, PositionId};
use commission_engine::infrastructure::market_data::{InMemoryQuoteProvider, InMemoryTradingData};
use commission_engine::infrastructure::persistence::InMemoryReferenceStore;

use common::{
    account, on_behalf_command, order_command, pnl_command, position, seed_quotes,
    seed_reference, swaps_command,
};

struct Fixture {
    trading: Arc<InMemoryTradingData>,
    quotes: Arc<InMemoryQuoteProvider>,
    caches: Arc<ReferenceCaches>,
    rates: Arc<RateResolver>,
    fx: Arc<FxConverter<InMemoryQuoteProvider>>,
}

impl Fixture {
    async fn new() -> Self {
        let store = Arc::new(InMemoryReferenceStore::new());
        seed_reference(&store);
        let caches = Arc::new(ReferenceCaches::new());
        ReferenceDataService::new(store, Arc::clone(&caches))
            .initialize()
            .await
            .unwrap();

        let quotes = Arc::new(InMemoryQuoteProvider::new());
        seed_quotes(&quotes);
        let trading = Arc::new(InMemoryTradingData::new());
        trading.add_account(account("acc-1"));

        Self {
            rates: Arc::new(RateResolver::new(
                Arc::clone(&caches),
                DefaultRatesConfig::default(),
            )),
            fx: Arc::new(FxConverter::new(Arc::clone(&caches), Arc::clone(&quotes))),
            trading,
            quotes,
            caches,
        }
    }

    fn swaps(&self) -> OvernightSwapEngine<InMemoryTradingData, InMemoryQuoteProvider> {
        OvernightSwapEngine::new(
            Arc::clone(&self.trading),
            Arc::clone(&self.caches),
            Arc::clone(&self.rates),
            Arc::clone(&self.fx),
        )
    }

    fn pnl(&self) -> DailyPnlEngine<InMemoryTradingData, InMemoryQuoteProvider> {
        DailyPnlEngine::new(
            Arc::clone(&self.trading),
            Arc::clone(&self.caches),
            Arc::clone(&self.fx),
        )
    }

    fn orders(&self) -> OrderExecutionEngine<InMemoryTradingData, InMemoryQuoteProvider> {
        OrderExecutionEngine::new(
            Arc::clone(&self.trading),
            Arc::clone(&self.caches),
            Arc::clone(&self.rates),
            Arc::clone(&self.fx),
        )
    }

    fn on_behalf(&self) -> OnBehalfEngine<InMemoryTradingData, InMemoryQuoteProvider> {
        OnBehalfEngine::new(
            Arc::clone(&self.trading),
            Arc::clone(&self.caches),
            Arc::clone(&self.rates),
            Arc::clone(&self.fx),
        )
    }
}

fn only(items: Vec<CalculationItem>) -> CalculationItem {
    assert_eq!(items.len(), 1);
    items.into_iter().next().unwrap()
}

// =============================================================================
// Overnight swaps
// =============================================================================

#[test_case(Direction::Long, 1, dec!(-0.09) ; "long one day")]
#[test_case(Direction::Short, 1, dec!(0.02) ; "short one day")]
#[test_case(Direction::Long, 3, dec!(-0.27) ; "long over weekend")]
#[tokio::test]
async fn swap_amount_by_direction_and_days(direction: Direction, days: u32, expected: Decimal) {
    let fixture = Fixture::new().await;
    fixture
        .trading
        .set_positions(vec![position("p-1", "EURUSD", direction, dec!(1000))]);
    let mut command = swaps_command("op-swap");
    command.number_of_financing_days = days;

    let item = only(fixture.swaps().calculate(&command).await.unwrap());

    assert!(item.is_success);
    assert_eq!(item.value, expected);
    match item.details {
        Some(ItemDetails::OvernightSwap {
            price, rate_source, ..
        }) => {
            assert_eq!(price, dec!(1.1));
            assert_eq!(rate_source, RateSource::InstrumentDefault);
        }
        other => panic!("unexpected details {other:?}"),
    }
}

#[tokio::test]
async fn swap_without_rate_record_uses_global_default() {
    let fixture = Fixture::new().await;
    fixture
        .trading
        .set_positions(vec![position("p-1", "GBPUSD", Direction::Long, dec!(1000))]);

    let item = only(fixture.swaps().calculate(&swaps_command("op-swap")).await.unwrap());

    // 1300 * -0.01 / 365
    assert_eq!(item.value, dec!(-0.04));
    assert!(matches!(
        item.details,
        Some(ItemDetails::OvernightSwap {
            rate_source: RateSource::GlobalDefault,
            ..
        })
    ));
}

#[tokio::test]
async fn swap_converts_into_account_asset() {
    let fixture = Fixture::new().await;
    let mut eur_position = position("p-1", "EURUSD", Direction::Long, dec!(1000));
    eur_position.account_asset_id = AssetId::new("EUR");
    fixture.trading.set_positions(vec![eur_position]);

    let item = only(fixture.swaps().calculate(&swaps_command("op-swap")).await.unwrap());

    // 1100 USD is 1000 EUR at 1.1; 1000 * -0.03 / 365
    assert_eq!(item.value, dec!(-0.08));
}

#[tokio::test]
async fn swap_items_are_indexed_by_sorted_position_id() {
    let fixture = Fixture::new().await;
    fixture.trading.set_positions(vec![
        position("p-b", "EURUSD", Direction::Long, dec!(1000)),
        position("p-a", "EURUSD", Direction::Short, dec!(1000)),
    ]);

    let items = fixture.swaps().calculate(&swaps_command("op-swap")).await.unwrap();

    assert_eq!(items[0].id.as_str(), "op-swap_0");
    assert_eq!(items[0].subject, ItemSubject::Position(PositionId::new("p-a")));
    assert_eq!(items[1].id.as_str(), "op-swap_1");
    assert_eq!(items[1].subject, ItemSubject::Position(PositionId::new("p-b")));
}

#[tokio::test]
async fn swap_skips_positions_opened_after_command() {
    let fixture = Fixture::new().await;
    let mut late = position("p-late", "EURUSD", Direction::Long, dec!(1000));
    late.opened_at = Utc.with_ymd_and_hms(2026, 1, 14, 22, 0, 0).unwrap();
    fixture.trading.set_positions(vec![
        position("p-1", "EURUSD", Direction::Long, dec!(1000)),
        late,
    ]);

    let items = fixture.swaps().calculate(&swaps_command("op-swap")).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].subject, ItemSubject::Position(PositionId::new("p-1")));
}

#[tokio::test]
async fn swap_item_failures_do_not_abort_batch() {
    let fixture = Fixture::new().await;
    fixture.quotes.remove(&AssetPairId::new("GBPUSD"));
    fixture.trading.set_positions(vec![
        position("p-1", "EURUSD", Direction::Long, dec!(1000)),
        position("p-2", "GBPUSD", Direction::Long, dec!(1000)),
        position("p-3", "XAUUSD", Direction::Long, dec!(1000)),
        position("p-4", "EURUSD", Direction::Long, dec!(0)),
    ]);

    let items = fixture.swaps().calculate(&swaps_command("op-swap")).await.unwrap();

    assert_eq!(items.len(), 4);
    assert!(items[0].is_success);
    assert_eq!(items[1].error_kind(), Some(ItemErrorKind::MissingQuote));
    assert_eq!(items[2].error_kind(), Some(ItemErrorKind::MissingAssetPair));
    assert_eq!(items[3].error_kind(), Some(ItemErrorKind::MalformedPosition));
    assert!(items[1..].iter().all(|item| item.value.is_zero() && item.details.is_none()));
}

#[tokio::test]
async fn swap_with_unreachable_trading_data_fails_operation() {
    let fixture = Fixture::new().await;
    fixture.trading.set_available(false);

    let result = fixture.swaps().calculate(&swaps_command("op-swap")).await;

    assert!(matches!(result, Err(CalculationError::TradingData(_))));
}

// =============================================================================
// Daily P&L
// =============================================================================

#[tokio::test]
async fn pnl_uses_close_side_and_subtracts_charged() {
    let fixture = Fixture::new().await;
    let mut long = position("p-1", "EURUSD", Direction::Long, dec!(1000));
    long.charged_pnl = dec!(2);
    let short = position("p-2", "EURUSD", Direction::Short, dec!(1000));
    fixture.trading.set_positions(vec![long, short]);

    let items = fixture.pnl().calculate(&pnl_command("op-pnl")).await.unwrap();

    // Long closes at bid 1.0999, short at ask 1.1001; open price 1.09.
    assert_eq!(items[0].value, dec!(7.90));
    assert_eq!(items[1].value, dec!(-10.10));
    assert!(matches!(
        items[1].details,
        Some(ItemDetails::DailyPnl { close_price, .. }) if close_price == dec!(1.1001)
    ));
}

#[tokio::test]
async fn pnl_with_unknown_account_asset_fails_item() {
    let fixture = Fixture::new().await;
    let mut jpy = position("p-1", "EURUSD", Direction::Long, dec!(1000));
    jpy.account_asset_id = AssetId::new("JPY");
    fixture.trading.set_positions(vec![jpy]);

    let item = only(fixture.pnl().calculate(&pnl_command("op-pnl")).await.unwrap());

    assert_eq!(item.error_kind(), Some(ItemErrorKind::MissingAsset));
}

// =============================================================================
// Order execution
// =============================================================================

#[test_case(dec!(-1000), dec!(2.00) ; "floor applies")]
#[test_case(dec!(50000), dec!(55.00) ; "proportional")]
#[test_case(dec!(200000), dec!(100.00) ; "cap applies")]
#[tokio::test]
async fn order_commission_is_clamped(volume: Decimal, expected: Decimal) {
    let fixture = Fixture::new().await;

    let item = only(
        fixture
            .orders()
            .calculate(&order_command("op-order", volume))
            .await
            .unwrap(),
    );

    assert_eq!(item.value, expected);
    assert_eq!(item.subject, ItemSubject::Order(OrderId::new("order-1")));
    assert!(matches!(
        item.details,
        Some(ItemDetails::OrderExecution {
            rate_source: RateSource::Exact,
            ..
        })
    ));
}

#[tokio::test]
async fn order_direction_follows_volume_sign() {
    let fixture = Fixture::new().await;

    let item = only(
        fixture
            .orders()
            .calculate(&order_command("op-order", dec!(-1000)))
            .await
            .unwrap(),
    );

    assert_eq!(item.direction, Some(Direction::Short));
    assert_eq!(item.trading_day, common::trading_day());
}

#[tokio::test]
async fn order_for_unknown_account_fails_operation() {
    let fixture = Fixture::new().await;
    let mut command = order_command("op-order", dec!(1000));
    command.account_id = AccountId::new("acc-missing");

    let result = fixture.orders().calculate(&command).await;

    assert!(matches!(result, Err(CalculationError::AccountNotFound { .. })));
}

// =============================================================================
// On-behalf
// =============================================================================

#[tokio::test]
async fn on_behalf_fee_is_per_action() {
    let fixture = Fixture::new().await;
    fixture
        .trading
        .set_on_behalf_actions(OrderId::new("order-1"), 3);

    let item = only(
        fixture
            .on_behalf()
            .calculate(&on_behalf_command("op-obh"))
            .await
            .unwrap(),
    );

    assert_eq!(item.value, dec!(4.50));
    assert_eq!(item.volume, dec!(3));
}

#[tokio::test]
async fn on_behalf_without_actions_produces_nothing() {
    let fixture = Fixture::new().await;

    let items = fixture
        .on_behalf()
        .calculate(&on_behalf_command("op-obh"))
        .await
        .unwrap();

    assert!(items.is_empty());
}
