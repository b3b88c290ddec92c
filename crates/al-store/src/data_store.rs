//! Row-level CRUD against the installed schema.
//!
//! DuckDB enforces NOT NULL and CHECK itself. Unique, foreign-key, and enum
//! constraints live in the schema registry, so writes are validated here
//! before they reach the store, and deletes apply the declared `on_delete`
//! actions inside one transaction.

use crate::entities::{tables, ReferralStatus};
use crate::error::{StoreError, StoreResult};
use al_db::{quote_ident as ident, Database, Row, Value};
use al_schema::{Catalog, ConstraintKind, LiveSchema, OnDelete, SchemaIntrospect};
use chrono::{Local, NaiveDateTime};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// One row as column → value.
pub type Record = BTreeMap<String, Value>;

/// Build a [`Record`] from `(column, value)` pairs.
pub fn record<V: Into<Value>>(pairs: impl IntoIterator<Item = (&'static str, V)>) -> Record {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into()))
        .collect()
}

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn lit(value: &Value) -> String {
    value.to_sql_literal()
}

fn id_list(ids: &[String]) -> String {
    ids.iter()
        .map(|id| al_db::quote_literal(id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn into_record(row: &Row) -> Record {
    row.iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Data store over one database connection.
pub struct DataStore<'a> {
    db: &'a dyn Database,
}

impl<'a> DataStore<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    async fn catalog(&self) -> StoreResult<Catalog> {
        Ok(LiveSchema::new(self.db).snapshot().await?)
    }

    fn ensure_columns<'r>(
        catalog: &Catalog,
        table: &str,
        columns: impl IntoIterator<Item = &'r String>,
    ) -> StoreResult<()> {
        let shape = catalog
            .table(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        for column in columns {
            if !shape.columns.contains_key(column) {
                return Err(StoreError::UnknownColumn {
                    table: table.to_string(),
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }

    /// Insert a row and return its id. A missing `id` gets a fresh UUID;
    /// missing timestamps are filled with the current time.
    pub async fn insert(&self, table: &str, mut row: Record) -> StoreResult<String> {
        let catalog = self.catalog().await?;
        Self::ensure_columns(&catalog, table, row.keys())?;

        let id = match row.get("id") {
            None | Some(Value::Null) => Uuid::new_v4().to_string(),
            Some(Value::Text(id)) => id.clone(),
            Some(other) => {
                return Err(StoreError::integrity(
                    table,
                    format!("id must be text, got {other}"),
                ))
            }
        };
        row.insert("id".to_string(), Value::Text(id.clone()));
        let ts = now();
        for column in [CREATED_AT, UPDATED_AT] {
            if catalog.column(table, column).is_some() {
                row.entry(column.to_string())
                    .or_insert(Value::Timestamp(ts));
            }
        }

        self.db.begin().await?;
        let result = self.insert_in_tx(&catalog, table, &id, &row).await;
        self.finish(result, || format!("insert {table}/{id}")).await?;
        log::debug!("Inserted {table}/{id}");
        Ok(id)
    }

    async fn insert_in_tx(&self, catalog: &Catalog, table: &str, id: &str, row: &Record) -> StoreResult<()> {
        if self.get(table, id).await?.is_some() {
            return Err(StoreError::integrity(table, format!("duplicate id {id}")));
        }
        self.validate(catalog, table, id, row).await?;

        let columns: Vec<String> = row.keys().map(|c| ident(c)).collect();
        let values: Vec<String> = row.values().map(lit).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            ident(table),
            columns.join(", "),
            values.join(", ")
        );
        self.db
            .execute(&sql)
            .await
            .map_err(|e| StoreError::from_write(table, e))?;
        Ok(())
    }

    /// Commit the open transaction when `result` is Ok, roll it back
    /// otherwise. `what` names the write in the rollback log.
    async fn finish<T>(&self, result: StoreResult<T>, what: impl FnOnce() -> String) -> StoreResult<T> {
        match result {
            Ok(value) => {
                self.db.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = self.db.rollback().await {
                    log::error!("Rollback of {} failed: {rollback_err}", what());
                }
                Err(e)
            }
        }
    }

    /// Fetch one row by id.
    pub async fn get(&self, table: &str, id: &str) -> StoreResult<Option<Record>> {
        let sql = format!(
            "SELECT * FROM {} WHERE id = {}",
            ident(table),
            al_db::quote_literal(id)
        );
        let rows = self.db.query_rows(&sql).await.map_err(|e| match e {
            al_db::DbError::TableNotFound(_) => StoreError::UnknownTable(table.to_string()),
            other => StoreError::Db(other),
        })?;
        Ok(rows.first().map(into_record))
    }

    /// Rows whose `column` equals `value` (`IS NULL` for [`Value::Null`]).
    pub async fn find_by(&self, table: &str, column: &str, value: &Value) -> StoreResult<Vec<Record>> {
        let catalog = self.catalog().await?;
        Self::ensure_columns(&catalog, table, [&column.to_string()])?;
        let predicate = match value {
            Value::Null => "IS NULL".to_string(),
            v => format!("= {}", lit(v)),
        };
        let sql = format!(
            "SELECT * FROM {} WHERE {} {predicate} ORDER BY id",
            ident(table),
            ident(column)
        );
        let rows = self.db.query_rows(&sql).await?;
        Ok(rows.iter().map(into_record).collect())
    }

    /// Apply `changes` to the row with `id`. `updated_at` is refreshed when
    /// the table has one.
    pub async fn update(&self, table: &str, id: &str, mut changes: Record) -> StoreResult<()> {
        let catalog = self.catalog().await?;
        Self::ensure_columns(&catalog, table, changes.keys())?;
        if changes.contains_key("id") {
            return Err(StoreError::integrity(table, "id cannot be changed"));
        }
        if self.get(table, id).await?.is_none() {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        if changes.is_empty() {
            return Ok(());
        }
        if catalog.column(table, UPDATED_AT).is_some() {
            changes
                .entry(UPDATED_AT.to_string())
                .or_insert(Value::Timestamp(now()));
        }
        self.db.begin().await?;
        let result = self.update_in_tx(&catalog, table, id, &changes).await;
        self.finish(result, || format!("update {table}/{id}")).await
    }

    async fn update_in_tx(&self, catalog: &Catalog, table: &str, id: &str, changes: &Record) -> StoreResult<()> {
        self.validate(catalog, table, id, changes).await?;

        let assignments: Vec<String> = changes
            .iter()
            .map(|(c, v)| format!("{} = {}", ident(c), lit(v)))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = {}",
            ident(table),
            assignments.join(", "),
            al_db::quote_literal(id)
        );
        self.db
            .execute(&sql)
            .await
            .map_err(|e| StoreError::from_write(table, e))?;
        Ok(())
    }

    /// Move a referral to `next`, refusing anything but
    /// `inprogress -> completed`.
    pub async fn set_referral_status(&self, id: &str, next: ReferralStatus) -> StoreResult<()> {
        let table = tables::REFERRALS;
        let row = self.get(table, id).await?.ok_or_else(|| StoreError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        })?;
        let current: ReferralStatus = row
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::integrity(table, "referral has no status"))?
            .parse()
            .map_err(|e: crate::entities::UnknownEnumValue| {
                StoreError::integrity(table, e.to_string())
            })?;
        if !current.can_transition_to(next) {
            return Err(StoreError::integrity(
                table,
                format!("status cannot move from {current} to {next}"),
            ));
        }
        self.update(table, id, record([("status", next)])).await
    }

    /// Delete one row, applying `on_delete` actions of every foreign key
    /// that points at it. Returns the number of rows removed, cascades
    /// included.
    pub async fn delete(&self, table: &str, id: &str) -> StoreResult<usize> {
        let catalog = self.catalog().await?;
        if !catalog.has_table(table) {
            return Err(StoreError::UnknownTable(table.to_string()));
        }
        if self.get(table, id).await?.is_none() {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }

        self.db.begin().await?;
        let result = self.delete_in_tx(&catalog, table, id).await;
        let removed = self.finish(result, || format!("delete {table}/{id}")).await?;
        log::debug!("Deleted {table}/{id} ({removed} rows)");
        Ok(removed)
    }

    async fn delete_in_tx(&self, catalog: &Catalog, table: &str, id: &str) -> StoreResult<usize> {
        // Walk referencing rows; children land after parents. Rows already
        // planned are not revisited, so reference cycles terminate.
        let mut plan: Vec<(String, Vec<String>)> = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        seen.insert((table.to_string(), id.to_string()));
        let mut frontier = vec![(table.to_string(), vec![id.to_string()])];

        while let Some((parent, ids)) = frontier.pop() {
            for fk in catalog.constraints.values() {
                let ConstraintKind::ForeignKey {
                    column,
                    ref_table,
                    on_delete,
                    ..
                } = &fk.kind
                else {
                    continue;
                };
                if *ref_table != parent {
                    continue;
                }
                let child = ident(&fk.table);
                let matches = format!("{} IN ({})", ident(column), id_list(&ids));

                match on_delete {
                    OnDelete::Restrict => {
                        let n = self
                            .db
                            .query_count(&format!("SELECT 1 FROM {child} WHERE {matches}"))
                            .await?;
                        if n > 0 {
                            return Err(StoreError::integrity(
                                &parent,
                                format!("{n} row(s) in {} still reference it", fk.table),
                            ));
                        }
                    }
                    OnDelete::SetNull => {
                        self.db
                            .execute(&format!(
                                "UPDATE {child} SET {} = NULL WHERE {matches}",
                                ident(column)
                            ))
                            .await
                            .map_err(|e| StoreError::from_write(&fk.table, e))?;
                    }
                    OnDelete::Cascade => {
                        let rows = self
                            .db
                            .query_rows(&format!("SELECT id FROM {child} WHERE {matches}"))
                            .await?;
                        let child_ids: Vec<String> = rows
                            .iter()
                            .filter_map(|r| r.text("id").map(str::to_string))
                            .filter(|child_id| seen.insert((fk.table.clone(), child_id.clone())))
                            .collect();
                        if !child_ids.is_empty() {
                            frontier.push((fk.table.clone(), child_ids));
                        }
                    }
                }
            }
            plan.push((parent, ids));
        }

        let mut removed = 0;
        for (table, ids) in plan.iter().rev() {
            removed += self
                .db
                .execute(&format!(
                    "DELETE FROM {} WHERE id IN ({})",
                    ident(table),
                    id_list(ids)
                ))
                .await
                .map_err(|e| StoreError::from_write(table, e))?;
        }
        Ok(removed)
    }

    /// Number of rows in `table`.
    pub async fn count(&self, table: &str) -> StoreResult<usize> {
        Ok(self
            .db
            .query_count(&format!("SELECT 1 FROM {}", ident(table)))
            .await?)
    }

    /// Check enum membership, uniqueness, and foreign-key targets for the
    /// columns being written to row `id`.
    async fn validate(&self, catalog: &Catalog, table: &str, id: &str, row: &Record) -> StoreResult<()> {
        for constraint in catalog.constraints_on(table) {
            let Some(value) = row.get(constraint.column()) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let column = constraint.column();

            match &constraint.kind {
                ConstraintKind::EnumBinding { enum_name, .. } => {
                    let members = catalog.enum_values(enum_name).unwrap_or_default();
                    let ok = value
                        .as_str()
                        .is_some_and(|v| members.iter().any(|m| m == v));
                    if !ok {
                        return Err(StoreError::integrity(
                            table,
                            format!("{column} = {value} is not a value of enum {enum_name}"),
                        ));
                    }
                }
                ConstraintKind::Unique { .. } => {
                    let n = self
                        .db
                        .query_count(&format!(
                            "SELECT 1 FROM {} WHERE {} = {} AND id <> {}",
                            ident(table),
                            ident(column),
                            lit(value),
                            al_db::quote_literal(id)
                        ))
                        .await?;
                    if n > 0 {
                        return Err(StoreError::integrity(
                            table,
                            format!("{} violated: {column} = {value} already exists", constraint.name),
                        ));
                    }
                }
                ConstraintKind::ForeignKey {
                    ref_table,
                    ref_column,
                    ..
                } => {
                    let n = self
                        .db
                        .query_count(&format!(
                            "SELECT 1 FROM {} WHERE {} = {}",
                            ident(ref_table),
                            ident(ref_column),
                            lit(value)
                        ))
                        .await?;
                    if n == 0 {
                        return Err(StoreError::integrity(
                            table,
                            format!(
                                "{} violated: no {ref_table}.{ref_column} = {value}",
                                constraint.name
                            ),
                        ));
                    }
                }
                ConstraintKind::Check { .. } => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "data_store_test.rs"]
mod tests;
