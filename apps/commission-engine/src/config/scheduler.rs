//! Scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Periodic start-command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the scheduler runs.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Seconds between scheduler ticks.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
    /// Day-count basis passed to overnight swap runs.
    #[serde(default = "default_financing_days_per_year")]
    pub financing_days_per_year: u32,
    /// Whether ticks start overnight swap runs.
    #[serde(default = "default_enabled")]
    pub overnight_swaps: bool,
    /// Whether ticks start daily P&L runs.
    #[serde(default = "default_enabled")]
    pub daily_pnl: bool,
}

impl SchedulerConfig {
    /// Tick interval as a [`Duration`].
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            tick_interval_secs: default_tick_interval_secs(),
            financing_days_per_year: default_financing_days_per_year(),
            overnight_swaps: default_enabled(),
            daily_pnl: default_enabled(),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

const fn default_tick_interval_secs() -> u64 {
    3_600
}

const fn default_financing_days_per_year() -> u32 {
    365
}
