//! Charging tracker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Charging tracker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargingConfig {
    /// Seconds to wait for all charge confirmations before forcing a summary.
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,
    /// Capacity of each session's confirmation channel.
    #[serde(default = "default_confirmation_buffer")]
    pub confirmation_buffer: usize,
}

impl ChargingConfig {
    /// Session timeout as a [`Duration`].
    #[must_use]
    pub const fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self {
            session_timeout_secs: default_session_timeout_secs(),
            confirmation_buffer: default_confirmation_buffer(),
        }
    }
}

const fn default_session_timeout_secs() -> u64 {
    600
}

const fn default_confirmation_buffer() -> usize {
    256
}
