//! al-core - Core library for Autolot
//!
//! Shared configuration parsing and the daily cron schedule used by the
//! retention job.

pub mod config;
pub mod error;
pub mod schedule;

pub use config::{Config, DatabaseConfig, RetentionConfig};
pub use error::{CoreError, CoreResult};
pub use schedule::DailySchedule;
