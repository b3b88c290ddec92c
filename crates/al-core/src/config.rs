//! Configuration types and parsing for autolot.yml

use crate::error::{CoreError, CoreResult};
use crate::schedule::DailySchedule;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration from autolot.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Deployment name, used in log lines
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Notification retention job settings
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Retention job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    /// Whether `retention serve` schedules ticks at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cron expression for the daily trigger
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Table whose rows expire
    #[serde(default = "default_retention_table")]
    pub table: String,

    /// Creation timestamp column compared against the cutoff
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,

    /// Retention window in calendar months
    #[serde(default = "default_window_months")]
    pub window_months: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_schedule(),
            table: default_retention_table(),
            timestamp_column: default_timestamp_column(),
            window_months: default_window_months(),
        }
    }
}

impl RetentionConfig {
    /// Parsed trigger schedule.
    pub fn daily_schedule(&self) -> CoreResult<DailySchedule> {
        DailySchedule::parse(&self.schedule)
    }
}

const DEFAULT_DB_PATH: &str = "autolot.duckdb";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_true() -> bool {
    true
}

fn default_schedule() -> String {
    "0 0 * * *".to_string()
}

fn default_retention_table() -> String {
    "notifications".to_string()
}

fn default_timestamp_column() -> String {
    "created_at".to_string()
}

fn default_window_months() -> u32 {
    1
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for autolot.yml or autolot.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("autolot.yml");
        let yaml_path = dir.join("autolot.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "name cannot be empty".to_string(),
            });
        }

        if self.database.path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if self.retention.window_months == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "retention.window_months must be at least 1".to_string(),
            });
        }

        if self.retention.table.is_empty() || self.retention.timestamp_column.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "retention.table and retention.timestamp_column are required"
                    .to_string(),
            });
        }

        self.retention.daily_schedule()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "autolot".to_string(),
            database: DatabaseConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
