//! Application Ports (Driver and Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! - **Driver Ports** (Primary/Inbound): How the message bus drives the engine
//! - **Driven Ports** (Secondary/Outbound): How the engine uses external systems

mod event_publisher_port;
mod inbound_handler_port;
mod quote_provider_port;
mod reference_data_port;
mod trading_data_port;

pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
pub use inbound_handler_port::{HandleOutcome, HandlerError, InboundHandlerPort};
pub use quote_provider_port::{QuoteError, QuoteProviderPort};
pub use reference_data_port::{RateSettingsRepository, ReferenceDataError, ReferenceDataPort};
pub use trading_data_port::{TradingDataError, TradingDataPort};
