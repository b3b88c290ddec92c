//! Scheduled deletion of expired notifications.
//!
//! A tick removes every row whose creation timestamp is older than the
//! retention window, measured in calendar months back from the tick time.
//! Failed ticks are logged and retried by the next trigger.

use crate::error::{RetentionError, RetentionResult};
use al_core::{DailySchedule, RetentionConfig};
use al_db::{quote_ident, Database, Value};
use chrono::{Local, Months, NaiveDateTime};
use std::future::Future;
use tokio::time::Instant;

/// Deletes rows of one table once they fall outside the retention window.
pub struct RetentionJob<'a> {
    db: &'a dyn Database,
    table: String,
    timestamp_column: String,
    window_months: u32,
}

impl<'a> RetentionJob<'a> {
    pub fn new(db: &'a dyn Database, config: &RetentionConfig) -> Self {
        Self {
            db,
            table: config.table.clone(),
            timestamp_column: config.timestamp_column.clone(),
            window_months: config.window_months,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Rows created strictly before this instant expire at `now`.
    pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        now.checked_sub_months(Months::new(self.window_months))
            .unwrap_or(NaiveDateTime::MIN)
    }

    /// Delete expired rows as of `now` and return how many were removed.
    pub async fn tick_at(&self, now: NaiveDateTime) -> RetentionResult<usize> {
        let cutoff = self.cutoff(now);
        let sql = format!(
            "DELETE FROM {} WHERE {} < {}",
            quote_ident(&self.table),
            quote_ident(&self.timestamp_column),
            Value::Timestamp(cutoff).to_sql_literal()
        );
        let removed = self
            .db
            .execute(&sql)
            .await
            .map_err(|source| RetentionError::Tick {
                table: self.table.clone(),
                source,
            })?;
        log::info!(
            "Retention removed {removed} row(s) from {} older than {cutoff}",
            self.table
        );
        Ok(removed)
    }

    /// Delete expired rows as of the local wall clock.
    pub async fn tick(&self) -> RetentionResult<usize> {
        self.tick_at(Local::now().naive_local()).await
    }

    /// Run one tick, logging a failure instead of returning it.
    pub async fn tick_logged(&self) -> Option<usize> {
        match self.tick().await {
            Ok(removed) => Some(removed),
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }

    /// Tick at every firing of `schedule` until `shutdown` resolves.
    /// Returns the number of ticks that ran, failed ones included.
    ///
    /// The wall clock picks the first firing only; later firings are
    /// spaced from the previous one on the monotonic clock.
    pub async fn run_scheduled(
        &self,
        schedule: DailySchedule,
        shutdown: impl Future<Output = ()>,
    ) -> usize {
        tokio::pin!(shutdown);
        let mut ticks = 0;
        log::info!("Retention for {} scheduled at '{schedule}'", self.table);

        let now = Local::now().naive_local();
        let mut next = schedule.next_after(now);
        let mut deadline = Instant::now() + (next - now).to_std().unwrap_or_default();
        loop {
            log::debug!("Next retention tick at {next}");
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    self.tick_logged().await;
                    ticks += 1;
                    let following = schedule.next_after(next);
                    deadline += (following - next).to_std().unwrap_or_default();
                    next = following;
                }
                _ = &mut shutdown => {
                    log::info!("Retention scheduler stopped after {ticks} tick(s)");
                    return ticks;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retention_test.rs"]
mod tests;
