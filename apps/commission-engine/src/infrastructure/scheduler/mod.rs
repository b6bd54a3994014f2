//! Daily Scheduler
//!
//! Enqueues the batch start commands once per trading day. Operation ids are
//! derived from the trading day, so every tick after the first on the same
//! day is a registry duplicate and does nothing.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use tokio_util::sync::CancellationToken;

use crate::application::dto::{Command, StartDailyPnlProcess, StartOvernightSwapsProcess};
use crate::config::SchedulerConfig;
use crate::domain::shared::OperationId;
use crate::infrastructure::messaging::InMemoryMessageBus;

/// Operation id of the overnight swap run of `day`.
#[must_use]
pub fn overnight_swaps_operation_id(day: NaiveDate) -> OperationId {
    OperationId::new(format!("overnight-swaps:{day}"))
}

/// Operation id of the daily P&L run of `day`.
#[must_use]
pub fn daily_pnl_operation_id(day: NaiveDate) -> OperationId {
    OperationId::new(format!("daily-pnl:{day}"))
}

/// Days financed by the swap run of `day`: Friday carries the weekend.
#[must_use]
pub fn financing_days(day: NaiveDate) -> u32 {
    if day.weekday() == Weekday::Fri { 3 } else { 1 }
}

/// Periodic producer of batch start commands.
pub struct DailyScheduler {
    bus: Arc<InMemoryMessageBus>,
    config: SchedulerConfig,
}

impl DailyScheduler {
    /// Create a new scheduler.
    pub const fn new(bus: Arc<InMemoryMessageBus>, config: SchedulerConfig) -> Self {
        Self { bus, config }
    }

    /// Commands due at `now`. Empty on weekends.
    #[must_use]
    pub fn commands_for(&self, now: DateTime<Utc>) -> Vec<Command> {
        let day = now.date_naive();
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            return Vec::new();
        }

        let mut commands = Vec::with_capacity(2);
        if self.config.overnight_swaps {
            commands.push(Command::StartOvernightSwapsProcess(
                StartOvernightSwapsProcess {
                    operation_id: overnight_swaps_operation_id(day),
                    created_at: now,
                    number_of_financing_days: financing_days(day),
                    financing_days_per_year: self.config.financing_days_per_year,
                    trading_day: day,
                },
            ));
        }
        if self.config.daily_pnl {
            commands.push(Command::StartDailyPnlProcess(StartDailyPnlProcess {
                operation_id: daily_pnl_operation_id(day),
                created_at: now,
                trading_day: day,
            }));
        }
        commands
    }

    /// Enqueue the commands due at `now`. Returns how many were enqueued.
    pub fn tick(&self, now: DateTime<Utc>) -> usize {
        let mut enqueued = 0;
        for command in self.commands_for(now) {
            let operation_id = command.operation_id().clone();
            match self.bus.publish(command) {
                Ok(_) => {
                    tracing::info!(operation_id = %operation_id, "Scheduled operation enqueued");
                    enqueued += 1;
                }
                Err(e) => {
                    tracing::error!(operation_id = %operation_id, error = %e, "Failed to enqueue scheduled operation");
                }
            }
        }
        enqueued
    }

    /// Tick every `tick_interval` until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        if !self.config.enabled {
            tracing::info!("Scheduler disabled");
            return;
        }

        let mut interval = tokio::time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tracing::info!(
            interval_secs = self.config.tick_interval_secs,
            "Scheduler started"
        );

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    self.tick(Utc::now());
                }
            }
        }
        tracing::info!("Scheduler stopped");
    }
}
