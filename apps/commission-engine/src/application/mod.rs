//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for the message bus, reference data and trading data
//! - **Caches**: Atomically swapped snapshots of reference data
//! - **Services**: Rate resolution, idempotency registry and charging tracking
//! - **Engines**: One calculation engine per operation kind
//! - **Use Cases**: Start, confirm and refresh workflows
//! - **DTOs**: Commands, events and inbound messages

pub mod caches;
pub mod dto;
pub mod engines;
pub mod ports;
pub mod services;
pub mod use_cases;
