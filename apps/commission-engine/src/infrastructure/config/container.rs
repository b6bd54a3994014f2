//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use serde::Serialize;

use crate::application::caches::ReferenceCaches;
use crate::application::dto::StartCommand;
use crate::application::engines::{
    CalculationEngine, DailyPnlEngine, OnBehalfEngine, OrderExecutionEngine, OvernightSwapEngine,
};
use crate::application::ports::{
    EventPublisherPort, QuoteProviderPort, RateSettingsRepository, ReferenceDataPort,
    TradingDataPort,
};
use crate::application::services::{
    ChargingTracker, FxConverter, OperationRegistry, RateResolver, RateSettingsService,
    ReferenceDataService,
};
use crate::application::use_cases::{
    ConfirmChargeUseCase, MessageRouter, RefreshReferenceDataUseCase, StartOperationUseCase,
    StartUseCases,
};
use crate::config::Config;
use crate::domain::calculation::CalculationHistoryRepository;
use crate::domain::operations::OperationRepository;
use crate::infrastructure::market_data::{InMemoryQuoteProvider, InMemoryTradingData};
use crate::infrastructure::messaging::BroadcastEventPublisher;
use crate::infrastructure::persistence::{
    InMemoryCalculationHistory, InMemoryOperationRepository, InMemoryReferenceStore,
};

/// Container wired entirely with in-memory adapters.
pub type InMemoryContainer = Container<
    InMemoryTradingData,
    InMemoryQuoteProvider,
    InMemoryOperationRepository,
    InMemoryCalculationHistory,
    BroadcastEventPublisher,
    InMemoryReferenceStore,
>;

/// Dependency injection container.
///
/// Holds the ports and the shared services. The registry, caches and
/// charging tracker are created once; every use case built from the
/// container shares them.
pub struct Container<T, Q, O, H, E, R>
where
    T: TradingDataPort + 'static,
    Q: QuoteProviderPort + 'static,
    O: OperationRepository + 'static,
    H: CalculationHistoryRepository + 'static,
    E: EventPublisherPort + 'static,
    R: ReferenceDataPort + RateSettingsRepository + 'static,
{
    // Ports
    trading: Arc<T>,
    history: Arc<H>,
    publisher: Arc<E>,

    // Shared services
    caches: Arc<ReferenceCaches>,
    rates: Arc<RateResolver>,
    fx: Arc<FxConverter<Q>>,
    registry: Arc<OperationRegistry<O>>,
    tracker: Arc<ChargingTracker<O, E>>,
    reference_data: Arc<ReferenceDataService<R>>,
    rate_settings: Arc<RateSettingsService<R>>,
}

impl<T, Q, O, H, E, R> Container<T, Q, O, H, E, R>
where
    T: TradingDataPort + 'static,
    Q: QuoteProviderPort + 'static,
    O: OperationRepository + 'static,
    H: CalculationHistoryRepository + 'static,
    E: EventPublisherPort + 'static,
    R: ReferenceDataPort + RateSettingsRepository + 'static,
{
    /// Create a new container with all dependencies.
    pub fn new(
        config: &Config,
        trading: Arc<T>,
        quotes: Arc<Q>,
        operations: Arc<O>,
        history: Arc<H>,
        publisher: Arc<E>,
        reference: Arc<R>,
    ) -> Self {
        let caches = Arc::new(ReferenceCaches::new());
        let rates = Arc::new(RateResolver::new(
            Arc::clone(&caches),
            config.default_rates.clone(),
        ));
        let fx = Arc::new(FxConverter::new(Arc::clone(&caches), quotes));
        let registry = Arc::new(OperationRegistry::new(operations));
        let tracker = Arc::new(ChargingTracker::new(
            Arc::clone(&registry),
            Arc::clone(&publisher),
            config.charging.session_timeout(),
            config.charging.confirmation_buffer,
        ));
        let reference_data = Arc::new(ReferenceDataService::new(
            Arc::clone(&reference),
            Arc::clone(&caches),
        ));
        let rate_settings = Arc::new(RateSettingsService::new(reference, Arc::clone(&caches)));

        Self {
            trading,
            history,
            publisher,
            caches,
            rates,
            fx,
            registry,
            tracker,
            reference_data,
            rate_settings,
        }
    }

    /// Get the reference caches.
    pub fn caches(&self) -> Arc<ReferenceCaches> {
        Arc::clone(&self.caches)
    }

    /// Get the operation registry.
    pub fn registry(&self) -> Arc<OperationRegistry<O>> {
        Arc::clone(&self.registry)
    }

    /// Get the charging tracker.
    pub fn tracker(&self) -> Arc<ChargingTracker<O, E>> {
        Arc::clone(&self.tracker)
    }

    /// Get the calculation history.
    pub fn history(&self) -> Arc<H> {
        Arc::clone(&self.history)
    }

    /// Get the event publisher.
    pub fn publisher(&self) -> Arc<E> {
        Arc::clone(&self.publisher)
    }

    /// Get the reference data service.
    pub fn reference_data(&self) -> Arc<ReferenceDataService<R>> {
        Arc::clone(&self.reference_data)
    }

    /// Get the rate settings service.
    pub fn rate_settings(&self) -> Arc<RateSettingsService<R>> {
        Arc::clone(&self.rate_settings)
    }

    /// Create the four start use cases.
    pub fn start_use_cases(&self) -> StartUseCases<T, Q, O, H, E> {
        StartUseCases {
            overnight_swaps: self.start_use_case(Arc::new(OvernightSwapEngine::new(
                Arc::clone(&self.trading),
                Arc::clone(&self.caches),
                Arc::clone(&self.rates),
                Arc::clone(&self.fx),
            ))),
            daily_pnl: self.start_use_case(Arc::new(DailyPnlEngine::new(
                Arc::clone(&self.trading),
                Arc::clone(&self.caches),
                Arc::clone(&self.fx),
            ))),
            order_execution: self.start_use_case(Arc::new(OrderExecutionEngine::new(
                Arc::clone(&self.trading),
                Arc::clone(&self.caches),
                Arc::clone(&self.rates),
                Arc::clone(&self.fx),
            ))),
            on_behalf: self.start_use_case(Arc::new(OnBehalfEngine::new(
                Arc::clone(&self.trading),
                Arc::clone(&self.caches),
                Arc::clone(&self.rates),
                Arc::clone(&self.fx),
            ))),
        }
    }

    fn start_use_case<En>(&self, engine: Arc<En>) -> StartOperationUseCase<En, O, H, E>
    where
        En: CalculationEngine,
        En::Command: StartCommand + Serialize,
    {
        StartOperationUseCase::new(
            engine,
            Arc::clone(&self.registry),
            Arc::clone(&self.history),
            Arc::clone(&self.tracker),
            Arc::clone(&self.publisher),
        )
    }

    /// Create a `ConfirmChargeUseCase`.
    pub fn confirm_charge_use_case(&self) -> ConfirmChargeUseCase<H, O, E> {
        ConfirmChargeUseCase::new(Arc::clone(&self.history), Arc::clone(&self.tracker))
    }

    /// Create a `RefreshReferenceDataUseCase`.
    pub fn refresh_reference_data_use_case(&self) -> RefreshReferenceDataUseCase<R> {
        RefreshReferenceDataUseCase::new(Arc::clone(&self.reference_data))
    }

    /// Create the inbound message router.
    pub fn message_router(&self) -> MessageRouter<T, Q, O, H, E, R> {
        MessageRouter::new(
            self.start_use_cases(),
            self.confirm_charge_use_case(),
            self.refresh_reference_data_use_case(),
        )
    }
}
