//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**
//!   - `persistence/`: Operation registry, calculation history, reference store
//!   - `market_data/`: Trading platform and quotes
//!   - `messaging/`: Event publishers
//!
//! - **Driver Adapters (Inbound)**
//!   - `messaging/`: Message bus and dispatcher
//!   - `scheduler/`: Daily batch triggers
//!
//! - **Wiring**
//!   - `config/`: Dependency injection container

pub mod config;
pub mod market_data;
pub mod messaging;
pub mod persistence;
pub mod scheduler;
