//! Refresh Reference Data Use Case

use std::sync::Arc;

use crate::application::ports::{HandleOutcome, HandlerError, ReferenceDataPort};
use crate::application::services::ReferenceDataService;
use crate::domain::reference::ReferenceDataKind;

/// Rebuilds caches after an upstream change notification.
pub struct RefreshReferenceDataUseCase<R: ReferenceDataPort> {
    service: Arc<ReferenceDataService<R>>,
}

impl<R: ReferenceDataPort> RefreshReferenceDataUseCase<R> {
    /// Create a new RefreshReferenceDataUseCase.
    pub const fn new(service: Arc<ReferenceDataService<R>>) -> Self {
        Self { service }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Transient`] when the data cannot be fetched;
    /// the previous cache generation stays in use until redelivery succeeds.
    pub async fn execute(&self, kind: ReferenceDataKind) -> Result<HandleOutcome, HandlerError> {
        self.service.handle_change(kind).await.map_err(|e| {
            tracing::warn!(kind = ?kind, error = %e, "Reference data refresh failed");
            HandlerError::from(e)
        })?;
        Ok(HandleOutcome::Acknowledged)
    }
}
