//! Reference Data Ports (Driven Ports)
//!
//! Full reference data sets used to rebuild the caches, and persistence of
//! rate tables.

use async_trait::async_trait;

use crate::domain::rates::{OnBehalfRate, OrderExecutionRate, OvernightSwapRate};
use crate::domain::reference::{Asset, AssetPair};

/// Reference data errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceDataError {
    /// The source could not be reached.
    #[error("Reference data unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

/// Port for loading complete reference data sets.
#[async_trait]
pub trait ReferenceDataPort: Send + Sync {
    /// All asset pairs.
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be reached.
    async fn asset_pairs(&self) -> Result<Vec<AssetPair>, ReferenceDataError>;

    /// All assets.
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be reached.
    async fn assets(&self) -> Result<Vec<Asset>, ReferenceDataError>;

    /// All overnight swap rates.
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be reached.
    async fn overnight_swap_rates(&self) -> Result<Vec<OvernightSwapRate>, ReferenceDataError>;

    /// All order execution rates.
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be reached.
    async fn order_execution_rates(&self)
    -> Result<Vec<OrderExecutionRate>, ReferenceDataError>;

    /// All on-behalf rates.
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be reached.
    async fn on_behalf_rates(&self) -> Result<Vec<OnBehalfRate>, ReferenceDataError>;
}

/// Port for persisting whole rate tables.
#[async_trait]
pub trait RateSettingsRepository: Send + Sync {
    /// Replace every overnight swap rate.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn replace_overnight_swap_rates(
        &self,
        rates: Vec<OvernightSwapRate>,
    ) -> Result<(), ReferenceDataError>;

    /// Replace every order execution rate.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn replace_order_execution_rates(
        &self,
        rates: Vec<OrderExecutionRate>,
    ) -> Result<(), ReferenceDataError>;

    /// Replace every on-behalf rate.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn replace_on_behalf_rates(&self, rates: Vec<OnBehalfRate>)
    -> Result<(), ReferenceDataError>;
}
