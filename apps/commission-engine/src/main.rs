//! Commission Engine Binary
//!
//! Consumes commands and charge confirmations from the message bus,
//! schedules the daily batch runs and publishes commission events.
//!
//! This binary is a self-contained reference wiring: every adapter is
//! in-memory, messages enter only through the in-process bus (fed by the
//! scheduler), and published events are written to the log. Charge
//! confirmations therefore never arrive, so sessions close through the
//! charging timeout. Deployments swap in real adapters through the
//! `Container` type parameters.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin commission-engine
//! ```
//!
//! # Environment Variables
//!
//! - `COMMISSION_CONFIG`: Path to the YAML config (default: config.yaml)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use commission_engine::CommissionEvent;
use commission_engine::config::{Config, load_config};
use commission_engine::infrastructure::market_data::{InMemoryQuoteProvider, InMemoryTradingData};
use commission_engine::infrastructure::messaging::{BroadcastEventPublisher, InMemoryMessageBus};
use commission_engine::infrastructure::persistence::{
    InMemoryCalculationHistory, InMemoryOperationRepository, InMemoryReferenceStore,
};
use commission_engine::observability::{init_metrics, init_tracing};
use commission_engine::{DailyScheduler, InMemoryContainer, MessageDispatcher};
use tokio::signal;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound event channel capacity.
const EVENT_CHANNEL_CAPACITY: usize = 10_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = load_config(None).context("loading configuration")?;
    init_tracing(&config.observability.logging).context("initializing tracing")?;

    tracing::info!("Starting Commission Engine");
    log_config(&config);

    if config.observability.metrics_port != 0 {
        init_metrics(config.observability.metrics_port).context("initializing metrics")?;
    }

    let publisher = Arc::new(BroadcastEventPublisher::new(EVENT_CHANNEL_CAPACITY));
    let container = InMemoryContainer::new(
        &config,
        Arc::new(InMemoryTradingData::new()),
        Arc::new(InMemoryQuoteProvider::new()),
        Arc::new(InMemoryOperationRepository::new()),
        Arc::new(InMemoryCalculationHistory::new()),
        Arc::clone(&publisher),
        Arc::new(InMemoryReferenceStore::new()),
    );

    container
        .reference_data()
        .initialize()
        .await
        .context("loading reference data")?;
    if container.caches().asset_pair_count() == 0 {
        tracing::warn!("No asset pairs loaded; calculations will fail until reference data arrives");
    }

    let event_log = tokio::spawn(log_events(publisher.subscribe()));

    let bus = Arc::new(InMemoryMessageBus::new());
    let shutdown_token = CancellationToken::new();

    let dispatcher = MessageDispatcher::new(
        Arc::new(container.message_router()),
        Arc::clone(&bus),
        config.messaging.clone(),
    );
    let dispatcher_token = shutdown_token.clone();
    let dispatcher_handle = tokio::spawn(async move { dispatcher.run(dispatcher_token).await });

    let scheduler = DailyScheduler::new(Arc::clone(&bus), config.scheduler.clone());
    let scheduler_token = shutdown_token.clone();
    let scheduler_handle = tokio::spawn(async move { scheduler.run(scheduler_token).await });

    tracing::info!("Commission engine ready");

    shutdown_signal().await;
    shutdown_token.cancel();

    let drained = tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
        if let Ok(Err(e)) = dispatcher_handle.await {
            tracing::error!(error = %e, "Dispatcher stopped with error");
        }
        let _ = scheduler_handle.await;
    })
    .await;
    if drained.is_err() {
        tracing::warn!(
            timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
            "Shutdown timed out with handlers still running"
        );
    }

    event_log.abort();

    let pending = container.tracker().active_sessions();
    if pending > 0 {
        tracing::warn!(sessions = pending, "Charging sessions abandoned at shutdown");
    }
    tracing::info!("Commission engine stopped");
    Ok(())
}

/// Log every published event until the publisher is dropped.
async fn log_events(mut events: broadcast::Receiver<CommissionEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => tracing::info!(
                event = event.name(),
                operation_id = %event.operation_id(),
                "Event published"
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event log lagged behind publisher");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn log_config(config: &Config) {
    tracing::info!(
        session_timeout_secs = config.charging.session_timeout_secs,
        max_delivery_attempts = config.messaging.max_delivery_attempts,
        handler_concurrency = config.messaging.handler_concurrency,
        scheduler_enabled = config.scheduler.enabled,
        metrics_port = config.observability.metrics_port,
        "Configuration loaded"
    );
}

/// Wait for Ctrl+C or SIGTERM.
///
/// A failure to install a handler is logged and that signal is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C handler installation failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler installation failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
