//! Shared fixtures for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use commission_engine::application::dto::{
    HandleOnBehalfInternal, HandleOrderExecutionInternal, StartDailyPnlProcess,
    StartOvernightSwapsProcess,
};
use commission_engine::application::use_cases::MessageRouter;
use commission_engine::config::Config;
use commission_engine::domain::calculation::{AccountSnapshot, Direction, PositionSnapshot};
use commission_engine::domain::rates::{OnBehalfRate, OrderExecutionRate, OvernightSwapRate};
use commission_engine::domain::reference::{Asset, AssetPair};
use commission_engine::domain::shared::{
    AccountId, AssetId, AssetPairId, OperationId, OrderId, PositionId, TradingConditionId,
};
use commission_engine::infrastructure::config::Container;
use commission_engine::infrastructure::market_data::{InMemoryQuoteProvider, InMemoryTradingData};
use commission_engine::infrastructure::messaging::RecordingEventPublisher;
use commission_engine::infrastructure::persistence::{
    InMemoryCalculationHistory, InMemoryOperationRepository, InMemoryReferenceStore,
};

pub type TestContainer = Container<
    InMemoryTradingData,
    InMemoryQuoteProvider,
    InMemoryOperationRepository,
    InMemoryCalculationHistory,
    RecordingEventPublisher,
    InMemoryReferenceStore,
>;

pub type TestRouter = MessageRouter<
    InMemoryTradingData,
    InMemoryQuoteProvider,
    InMemoryOperationRepository,
    InMemoryCalculationHistory,
    RecordingEventPublisher,
    InMemoryReferenceStore,
>;

/// All adapters plus the wired container.
pub struct Harness {
    pub trading: Arc<InMemoryTradingData>,
    pub quotes: Arc<InMemoryQuoteProvider>,
    pub operations: Arc<InMemoryOperationRepository>,
    pub history: Arc<InMemoryCalculationHistory>,
    pub publisher: Arc<RecordingEventPublisher>,
    pub reference: Arc<InMemoryReferenceStore>,
    pub container: TestContainer,
    pub router: TestRouter,
}

impl Harness {
    /// Harness with default config and the standard reference data loaded.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let trading = Arc::new(InMemoryTradingData::new());
        let quotes = Arc::new(InMemoryQuoteProvider::new());
        let operations = Arc::new(InMemoryOperationRepository::new());
        let history = Arc::new(InMemoryCalculationHistory::new());
        let publisher = Arc::new(RecordingEventPublisher::new());
        let reference = Arc::new(InMemoryReferenceStore::new());

        seed_reference(&reference);
        seed_quotes(&quotes);

        let container = Container::new(
            &config,
            Arc::clone(&trading),
            Arc::clone(&quotes),
            Arc::clone(&operations),
            Arc::clone(&history),
            Arc::clone(&publisher),
            Arc::clone(&reference),
        );
        container.reference_data().initialize().await.unwrap();
        let router = container.message_router();

        Self {
            trading,
            quotes,
            operations,
            history,
            publisher,
            reference,
            container,
            router,
        }
    }
}

// =============================================================================
// Reference data
// =============================================================================

pub fn pair(id: &str, accuracy: u32) -> AssetPair {
    AssetPair {
        id: AssetPairId::new(id),
        base_asset_id: AssetId::new(&id[..3]),
        quote_asset_id: AssetId::new(&id[3..]),
        accuracy,
        legal_entity: "LE-1".to_string(),
    }
}

pub fn asset(id: &str, accuracy: u32) -> Asset {
    Asset {
        id: AssetId::new(id),
        accuracy,
    }
}

/// EURUSD at 2dp with an instrument-level swap rate, GBPUSD at 2dp with no
/// rate records, and an order execution rate for trading condition `tc-1`.
pub fn seed_reference(store: &InMemoryReferenceStore) {
    store.set_asset_pairs(vec![pair("EURUSD", 2), pair("GBPUSD", 2)]);
    store.set_assets(vec![asset("USD", 2), asset("EUR", 2), asset("GBP", 2)]);
    store.set_overnight_swap_rates(vec![eurusd_swap_rate()]);
    store.set_order_execution_rates(vec![OrderExecutionRate {
        asset_pair_id: AssetPairId::new("EURUSD"),
        trading_condition_id: Some(TradingConditionId::new("tc-1")),
        commission_cap: dec!(100),
        commission_floor: dec!(2),
        commission_rate: dec!(0.001),
        commission_asset: AssetId::new("USD"),
        legal_entity: "LE-1".to_string(),
    }]);
    store.set_on_behalf_rates(vec![OnBehalfRate {
        trading_condition_id: Some(TradingConditionId::new("tc-1")),
        commission: dec!(1.5),
        commission_asset: AssetId::new("USD"),
        legal_entity: "LE-1".to_string(),
    }]);
}

pub fn eurusd_swap_rate() -> OvernightSwapRate {
    OvernightSwapRate {
        asset_pair_id: AssetPairId::new("EURUSD"),
        trading_condition_id: None,
        fix_rate: dec!(0.01),
        repo_surcharge_percent: dec!(0.005),
        variable_rate_base: dec!(0.03),
        variable_rate_quote: dec!(0.05),
    }
}

/// EURUSD mid 1.1, GBPUSD mid 1.3.
pub fn seed_quotes(quotes: &InMemoryQuoteProvider) {
    quotes.set_quote(AssetPairId::new("EURUSD"), dec!(1.0999), dec!(1.1001));
    quotes.set_quote(AssetPairId::new("GBPUSD"), dec!(1.2999), dec!(1.3001));
}

// =============================================================================
// Trading data
// =============================================================================

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 14, 21, 0, 0).unwrap()
}

pub fn trading_day() -> NaiveDate {
    now().date_naive()
}

pub fn position(id: &str, instrument: &str, direction: Direction, volume: Decimal) -> PositionSnapshot {
    PositionSnapshot {
        id: PositionId::new(id),
        account_id: AccountId::new("acc-1"),
        account_asset_id: AssetId::new("USD"),
        asset_pair_id: AssetPairId::new(instrument),
        trading_condition_id: TradingConditionId::new("tc-1"),
        direction,
        volume,
        open_price: dec!(1.09),
        charged_pnl: Decimal::ZERO,
        opened_at: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
    }
}

pub fn account(id: &str) -> AccountSnapshot {
    AccountSnapshot {
        id: AccountId::new(id),
        trading_condition_id: TradingConditionId::new("tc-1"),
        base_asset_id: AssetId::new("USD"),
        legal_entity: "LE-1".to_string(),
    }
}

// =============================================================================
// Commands
// =============================================================================

pub fn swaps_command(op: &str) -> StartOvernightSwapsProcess {
    StartOvernightSwapsProcess {
        operation_id: OperationId::new(op),
        created_at: now(),
        number_of_financing_days: 1,
        financing_days_per_year: 365,
        trading_day: trading_day(),
    }
}

pub fn pnl_command(op: &str) -> StartDailyPnlProcess {
    StartDailyPnlProcess {
        operation_id: OperationId::new(op),
        created_at: now(),
        trading_day: trading_day(),
    }
}

pub fn order_command(op: &str, volume: Decimal) -> HandleOrderExecutionInternal {
    HandleOrderExecutionInternal {
        operation_id: OperationId::new(op),
        created_at: now(),
        account_id: AccountId::new("acc-1"),
        order_id: OrderId::new("order-1"),
        order_code: "ORD-0001".to_string(),
        instrument: AssetPairId::new("EURUSD"),
        legal_entity: "LE-1".to_string(),
        volume,
    }
}

pub fn on_behalf_command(op: &str) -> HandleOnBehalfInternal {
    HandleOnBehalfInternal {
        operation_id: OperationId::new(op),
        created_at: now(),
        account_id: AccountId::new("acc-1"),
        account_asset_id: AssetId::new("USD"),
        order_id: OrderId::new("order-1"),
        asset_pair_id: AssetPairId::new("EURUSD"),
        trading_day: trading_day(),
    }
}
