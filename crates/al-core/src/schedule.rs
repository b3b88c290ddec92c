//! Daily cron schedules.
//!
//! Only the daily form `M H * * *` is accepted: a fixed minute and hour with
//! wildcards for day-of-month, month and day-of-week.

use crate::error::{CoreError, CoreResult};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::fmt;
use std::str::FromStr;

/// Fires once per day at `hour:minute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    minute: u32,
    hour: u32,
}

impl DailySchedule {
    /// Midnight every day (`0 0 * * *`).
    pub const MIDNIGHT: DailySchedule = DailySchedule { minute: 0, hour: 0 };

    /// Parse a five-field cron expression.
    pub fn parse(expression: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidSchedule {
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = expression.split_whitespace().collect();
        let [minute, hour, dom, month, dow] = fields.as_slice() else {
            return Err(invalid("expected 5 fields: minute hour day month weekday"));
        };

        if [dom, month, dow].iter().any(|f| **f != "*") {
            return Err(invalid("day, month and weekday fields must be '*'"));
        }

        let minute: u32 = minute
            .parse()
            .map_err(|_| invalid("minute must be a number"))?;
        let hour: u32 = hour.parse().map_err(|_| invalid("hour must be a number"))?;
        if minute > 59 {
            return Err(invalid("minute must be in 0..=59"));
        }
        if hour > 23 {
            return Err(invalid("hour must be in 0..=23"));
        }

        Ok(Self { minute, hour })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// The first firing time strictly after `now`.
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let fire_at = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN);
        let today = now.date().and_time(fire_at);
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

impl FromStr for DailySchedule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} * * *", self.minute, self.hour)
    }
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
