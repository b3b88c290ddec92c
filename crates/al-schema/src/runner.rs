//! The migration runner.
//!
//! Moves a store between schema versions. The registry of units is fixed at
//! construction; the store's history table decides which of them are
//! pending. Each unit runs inside one transaction together with its history
//! write, so a unit is either fully applied and recorded or not at all.

use crate::error::{SchemaError, SchemaResult};
use crate::executor::{apply_op, OpOutcome};
use crate::history::{self, AppliedMigration};
use crate::metadata;
use crate::migration::Migration;
use crate::op::SchemaOp;
use crate::version::MigrationId;
use al_db::Database;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Result of running one unit in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub id: String,
    /// Operations that changed the store.
    pub applied_ops: usize,
    /// Operations whose guard found the effect already present.
    pub skipped_ops: usize,
}

/// Units applied by one `apply_*` call, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<UnitReport>,
}

impl ApplyReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }
}

/// Units removed from history by one `revert` call, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevertReport {
    pub reverted: Vec<UnitReport>,
    /// Units without an inverse: removed from history, schema untouched.
    pub irreversible: Vec<String>,
}

impl RevertReport {
    /// Total history rows removed.
    pub fn len(&self) -> usize {
        self.reverted.len() + self.irreversible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One line of `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationState {
    pub id: String,
    pub applied_at: Option<NaiveDateTime>,
    pub reversible: bool,
    /// False for history rows the registry does not know.
    pub registered: bool,
}

/// Applies and reverts a registry of migration units against one store.
pub struct MigrationRunner<'a> {
    db: &'a dyn Database,
    units: Vec<Migration>,
}

impl<'a> MigrationRunner<'a> {
    /// Sort `units` by id and reject duplicate ids.
    pub fn new(db: &'a dyn Database, mut units: Vec<Migration>) -> SchemaResult<Self> {
        units.sort_by(|a, b| a.id().cmp(b.id()));
        if let Some(pair) = units.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(SchemaError::DuplicateMigration(pair[0].id().to_string()));
        }
        Ok(Self { db, units })
    }

    /// Registered units in application order.
    pub fn units(&self) -> &[Migration] {
        &self.units
    }

    async fn history(&self) -> SchemaResult<Vec<AppliedMigration>> {
        metadata::ensure(self.db).await?;
        history::read_applied(self.db).await
    }

    /// Units not yet recorded as applied, in application order.
    pub async fn pending(&self) -> SchemaResult<Vec<&Migration>> {
        let applied: HashSet<String> = self
            .history()
            .await?
            .into_iter()
            .map(|h| h.version)
            .collect();
        Ok(self
            .units
            .iter()
            .filter(|u| !applied.contains(&u.id().to_string()))
            .collect())
    }

    /// Every registered unit with its applied state, followed by recorded
    /// ids the registry does not contain.
    pub async fn status(&self) -> SchemaResult<Vec<MigrationState>> {
        let history = self.history().await?;
        let mut applied: HashMap<&str, NaiveDateTime> = history
            .iter()
            .map(|h| (h.version.as_str(), h.applied_at))
            .collect();

        let mut states: Vec<MigrationState> = self
            .units
            .iter()
            .map(|unit| {
                let id = unit.id().to_string();
                MigrationState {
                    applied_at: applied.remove(id.as_str()),
                    reversible: unit.is_reversible(),
                    registered: true,
                    id,
                }
            })
            .collect();

        states.extend(history.iter().filter_map(|h| {
            applied.get(h.version.as_str()).map(|at| MigrationState {
                id: h.version.clone(),
                applied_at: Some(*at),
                reversible: false,
                registered: false,
            })
        }));
        Ok(states)
    }

    /// Apply every pending unit in ascending id order.
    ///
    /// Stops at the first failing unit; units applied before it stay applied
    /// and recorded.
    pub async fn apply_pending(&self) -> SchemaResult<ApplyReport> {
        self.apply_until(None).await
    }

    /// Apply pending units up to and including `target`, given as a full id
    /// or a bare token.
    pub async fn apply_through(&self, target: &str) -> SchemaResult<ApplyReport> {
        let limit = self
            .units
            .iter()
            .filter(|u| u.id().matches(target))
            .map(Migration::id)
            .max()
            .ok_or_else(|| SchemaError::UnknownMigration(target.to_string()))?
            .clone();
        self.apply_until(Some(&limit)).await
    }

    async fn apply_until(&self, limit: Option<&MigrationId>) -> SchemaResult<ApplyReport> {
        let history = self.history().await?;
        let recorded: HashSet<&str> = history.iter().map(|h| h.version.as_str()).collect();
        let newest = history
            .iter()
            .filter_map(|h| MigrationId::parse(&h.version).ok())
            .max();

        let mut report = ApplyReport::default();
        for unit in &self.units {
            if limit.is_some_and(|l| unit.id() > l) {
                break;
            }
            let id = unit.id().to_string();
            if recorded.contains(id.as_str()) {
                continue;
            }
            if let Some(newest) = &newest {
                if unit.id() < newest {
                    log::warn!("Applying {id} out of order: {newest} is already applied");
                }
            }

            let unit_report = self
                .run_unit(unit, unit.up(), &history::record_sql(unit.id()))
                .await?;
            log::info!(
                "Applied {id} ({} ops, {} skipped)",
                unit_report.applied_ops,
                unit_report.skipped_ops
            );
            report.applied.push(unit_report);
        }

        if report.is_empty() {
            log::info!("Schema is up to date");
        }
        Ok(report)
    }

    /// Run the inverses of the last `n` applied units, newest first.
    ///
    /// A unit without an inverse is dropped from history with a warning and
    /// listed as irreversible. Every history row is resolved against the
    /// registry before anything runs.
    pub async fn revert(&self, n: usize) -> SchemaResult<RevertReport> {
        let history = self.history().await?;
        let targets: Vec<&Migration> = history
            .iter()
            .rev()
            .take(n)
            .map(|h| {
                self.units
                    .iter()
                    .find(|u| u.id().to_string() == h.version)
                    .ok_or_else(|| SchemaError::UnknownMigration(h.version.clone()))
            })
            .collect::<SchemaResult<_>>()?;

        let mut report = RevertReport::default();
        for unit in targets {
            let id = unit.id().to_string();
            let remove = history::remove_sql(&id);
            match unit.down() {
                Some(ops) => {
                    let unit_report = self.run_unit(unit, ops, &remove).await?;
                    log::info!("Reverted {id} ({} ops)", unit_report.applied_ops);
                    report.reverted.push(unit_report);
                }
                None => {
                    log::warn!("{id} has no inverse; removing it from history only");
                    self.db.execute(&remove).await.map_err(|e| unit_failed(unit, e.into()))?;
                    report.irreversible.push(id);
                }
            }
        }
        Ok(report)
    }

    /// Run `ops` and the history statement in one transaction.
    async fn run_unit(
        &self,
        unit: &Migration,
        ops: &[SchemaOp],
        history_sql: &str,
    ) -> SchemaResult<UnitReport> {
        self.db.begin().await.map_err(|e| unit_failed(unit, e.into()))?;

        let outcome = self.run_ops(ops, history_sql).await;
        let (applied_ops, skipped_ops) = match outcome {
            Ok(counts) => counts,
            Err(e) => {
                if let Err(rollback_err) = self.db.rollback().await {
                    log::error!("Rollback of {} failed: {rollback_err}", unit.id());
                }
                log::error!("Migration {} failed: {e}", unit.id());
                return Err(unit_failed(unit, e));
            }
        };

        self.db.commit().await.map_err(|e| unit_failed(unit, e.into()))?;
        Ok(UnitReport {
            id: unit.id().to_string(),
            applied_ops,
            skipped_ops,
        })
    }

    async fn run_ops(&self, ops: &[SchemaOp], history_sql: &str) -> SchemaResult<(usize, usize)> {
        let (mut applied, mut skipped) = (0, 0);
        for op in ops {
            match apply_op(self.db, op).await? {
                OpOutcome::Applied => applied += 1,
                OpOutcome::Skipped(_) => skipped += 1,
            }
        }
        self.db.execute(history_sql).await?;
        Ok((applied, skipped))
    }
}

fn unit_failed(unit: &Migration, source: SchemaError) -> SchemaError {
    SchemaError::UnitFailed {
        migration: unit.id().to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
