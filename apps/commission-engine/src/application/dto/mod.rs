//! Data Transfer Objects (DTOs)
//!
//! Commands and messages arriving over the bus, and events published back.

mod commands;
mod events;
mod inbound;

pub use commands::{
    Command, CommandValidationError, HandleOnBehalfInternal, HandleOrderExecutionInternal,
    StartCommand, StartDailyPnlProcess, StartOvernightSwapsProcess,
};
pub use events::{
    CalculatedEvent, ChargedEvent, CommissionCalculatedInternal, CommissionEvent, CommissionType,
    DailyPnlCalculatedInternal, OvernightSwapCalculatedInternal, StartFailedEvent,
};
pub use inbound::InboundMessage;
