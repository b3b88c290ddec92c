//! Runtime context for CLI commands

use al_core::Config;
use al_db::{Database, DuckDbBackend};
use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::GlobalArgs;

/// Loaded configuration plus an open store connection
pub struct RuntimeContext {
    pub config: Config,
    pub db: DuckDbBackend,
}

impl RuntimeContext {
    /// Load config and open the database named by the global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let mut config = load_config(args)?;
        if let Some(path) = &args.database {
            config.database.path = path.clone();
        }

        let db = DuckDbBackend::new(&config.database.path).with_context(|| {
            format!("Failed to open database at {}", config.database.path)
        })?;
        log::debug!(
            "Opened {} database for '{}' at {}",
            db.db_type(),
            config.name,
            config.database.path
        );

        Ok(Self { config, db })
    }

    pub fn db(&self) -> &dyn Database {
        &self.db
    }
}

/// Explicit `--config` must exist; otherwise ./autolot.yml is optional.
fn load_config(args: &GlobalArgs) -> Result<Config> {
    if let Some(path) = &args.config {
        return Config::load(Path::new(path))
            .with_context(|| format!("Failed to load configuration from {path}"));
    }

    let cwd = Path::new(".");
    if cwd.join("autolot.yml").exists() || cwd.join("autolot.yaml").exists() {
        Config::load_from_dir(cwd).context("Failed to load project configuration")
    } else {
        log::debug!("No autolot.yml found, using defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
