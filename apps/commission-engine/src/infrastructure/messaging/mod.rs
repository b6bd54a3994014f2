//! Messaging Adapters
//!
//! In-process stand-ins for the message broker:
//!
//! - `InMemoryMessageBus`: queue of inbound envelopes plus a dead-letter list
//! - `MessageDispatcher`: concurrent consumer with redelivery and backoff
//! - `BroadcastEventPublisher`: fan-out of outbound events to subscribers
//! - `RecordingEventPublisher`: captures outbound events for assertions

mod bus;
mod dispatcher;
mod publishers;

pub use bus::{BusError, DeadLetter, Envelope, InMemoryMessageBus};
pub use dispatcher::{DispatcherError, MessageDispatcher};
pub use publishers::{BroadcastEventPublisher, RecordingEventPublisher};
