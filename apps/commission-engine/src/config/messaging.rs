//! Message bus configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Inbound message dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Deliveries attempted before a message is dead-lettered.
    #[serde(default = "default_max_delivery_attempts")]
    pub max_delivery_attempts: u32,
    /// Delay before the first redelivery, in milliseconds.
    #[serde(default = "default_redelivery_backoff_ms")]
    pub redelivery_backoff_ms: u64,
    /// Upper bound for the exponential redelivery delay, in milliseconds.
    #[serde(default = "default_max_redelivery_backoff_ms")]
    pub max_redelivery_backoff_ms: u64,
    /// Messages handled concurrently.
    #[serde(default = "default_handler_concurrency")]
    pub handler_concurrency: usize,
}

impl MessagingConfig {
    /// Delay before redelivering a message that has failed `attempt` times.
    ///
    /// Doubles per attempt and saturates at `max_redelivery_backoff_ms`.
    #[must_use]
    pub fn redelivery_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let millis = self
            .redelivery_backoff_ms
            .saturating_mul(1_u64 << exponent)
            .min(self.max_redelivery_backoff_ms);
        Duration::from_millis(millis)
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            max_delivery_attempts: default_max_delivery_attempts(),
            redelivery_backoff_ms: default_redelivery_backoff_ms(),
            max_redelivery_backoff_ms: default_max_redelivery_backoff_ms(),
            handler_concurrency: default_handler_concurrency(),
        }
    }
}

const fn default_max_delivery_attempts() -> u32 {
    5
}

const fn default_redelivery_backoff_ms() -> u64 {
    500
}

const fn default_max_redelivery_backoff_ms() -> u64 {
    30_000
}

const fn default_handler_concurrency() -> usize {
    16
}
