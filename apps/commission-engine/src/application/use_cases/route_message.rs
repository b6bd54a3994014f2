//! Message Router
//!
//! Dispatches each inbound message to the use case that owns it.

use async_trait::async_trait;

use super::{ConfirmChargeUseCase, RefreshReferenceDataUseCase, StartOperationUseCase};
use crate::application::dto::{Command, InboundMessage};
use crate::application::engines::{
    DailyPnlEngine, OnBehalfEngine, OrderExecutionEngine, OvernightSwapEngine,
};
use crate::application::ports::{
    EventPublisherPort, HandleOutcome, HandlerError, InboundHandlerPort, QuoteProviderPort,
    ReferenceDataPort, TradingDataPort,
};
use crate::domain::calculation::CalculationHistoryRepository;
use crate::domain::operations::OperationRepository;

/// The four start use cases, one per operation kind.
pub struct StartUseCases<T, Q, O, H, E>
where
    T: TradingDataPort,
    Q: QuoteProviderPort,
    O: OperationRepository + 'static,
    H: CalculationHistoryRepository,
    E: EventPublisherPort + 'static,
{
    /// Overnight swap runs.
    pub overnight_swaps: StartOperationUseCase<OvernightSwapEngine<T, Q>, O, H, E>,
    /// Daily P&L runs.
    pub daily_pnl: StartOperationUseCase<DailyPnlEngine<T, Q>, O, H, E>,
    /// Order execution commission.
    pub order_execution: StartOperationUseCase<OrderExecutionEngine<T, Q>, O, H, E>,
    /// On-behalf fees.
    pub on_behalf: StartOperationUseCase<OnBehalfEngine<T, Q>, O, H, E>,
}

/// Inbound handler for every message type the engine consumes.
pub struct MessageRouter<T, Q, O, H, E, R>
where
    T: TradingDataPort,
    Q: QuoteProviderPort,
    O: OperationRepository + 'static,
    H: CalculationHistoryRepository,
    E: EventPublisherPort + 'static,
    R: ReferenceDataPort,
{
    start: StartUseCases<T, Q, O, H, E>,
    confirm_charge: ConfirmChargeUseCase<H, O, E>,
    refresh_reference_data: RefreshReferenceDataUseCase<R>,
}

impl<T, Q, O, H, E, R> MessageRouter<T, Q, O, H, E, R>
where
    T: TradingDataPort,
    Q: QuoteProviderPort,
    O: OperationRepository + 'static,
    H: CalculationHistoryRepository,
    E: EventPublisherPort + 'static,
    R: ReferenceDataPort,
{
    /// Create a new MessageRouter.
    pub const fn new(
        start: StartUseCases<T, Q, O, H, E>,
        confirm_charge: ConfirmChargeUseCase<H, O, E>,
        refresh_reference_data: RefreshReferenceDataUseCase<R>,
    ) -> Self {
        Self {
            start,
            confirm_charge,
            refresh_reference_data,
        }
    }

    async fn handle_command(&self, command: &Command) -> Result<HandleOutcome, HandlerError> {
        match command {
            Command::StartOvernightSwapsProcess(cmd) => self.start.overnight_swaps.execute(cmd).await,
            Command::StartDailyPnlProcess(cmd) => self.start.daily_pnl.execute(cmd).await,
            Command::HandleOrderExecutionInternal(cmd) => {
                self.start.order_execution.execute(cmd).await
            }
            Command::HandleOnBehalfInternal(cmd) => self.start.on_behalf.execute(cmd).await,
        }
    }
}

#[async_trait]
impl<T, Q, O, H, E, R> InboundHandlerPort for MessageRouter<T, Q, O, H, E, R>
where
    T: TradingDataPort,
    Q: QuoteProviderPort,
    O: OperationRepository + 'static,
    H: CalculationHistoryRepository,
    E: EventPublisherPort + 'static,
    R: ReferenceDataPort,
{
    async fn handle(&self, message: InboundMessage) -> Result<HandleOutcome, HandlerError> {
        tracing::debug!(message = message.name(), "Handling inbound message");
        match message {
            InboundMessage::Command(command) => self.handle_command(&command).await,
            InboundMessage::ChargeConfirmed {
                sub_operation_id,
                succeeded,
            } => {
                self.confirm_charge
                    .execute(&sub_operation_id, succeeded)
                    .await
            }
            InboundMessage::ReferenceDataChanged { kind } => {
                self.refresh_reference_data.execute(kind).await
            }
        }
    }
}
