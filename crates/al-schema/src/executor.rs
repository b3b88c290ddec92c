//! Guarded execution of schema operations against a live store.
//!
//! Each call snapshots the store, runs the same guard the in-memory catalog
//! uses, and only then issues DDL. Registry rows in `al_meta` are written
//! through the same connection, so a surrounding transaction covers both.

use crate::catalog::Catalog;
use crate::error::{SchemaError, SchemaResult};
use crate::guard::{check, Guard};
use crate::introspect::{LiveSchema, SchemaIntrospect};
use crate::metadata;
use crate::op::SchemaOp;
use crate::types::{ColumnType, Constraint, ConstraintKind};
use al_db::{quote_ident as ident, quote_literal as lit, Database};

/// What happened to one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    Applied,
    /// The guard found the effect already present; nothing was issued.
    Skipped(String),
}

impl OpOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, OpOutcome::Applied)
    }
}

/// Apply one operation to the store behind `db`.
pub async fn apply_op(db: &dyn Database, op: &SchemaOp) -> SchemaResult<OpOutcome> {
    metadata::ensure(db).await?;
    let catalog = LiveSchema::new(db).snapshot().await?;

    if let Guard::Skip(reason) = check(&catalog, op)? {
        log::debug!("skip {op}: {reason}");
        return Ok(OpOutcome::Skipped(reason));
    }

    log::debug!("apply {op}");
    Executor { db, op, catalog: &catalog }.run().await?;
    Ok(OpOutcome::Applied)
}

struct Executor<'a> {
    db: &'a dyn Database,
    op: &'a SchemaOp,
    catalog: &'a Catalog,
}

impl Executor<'_> {
    /// Issue DDL; store-side failures become rejections of this operation.
    async fn ddl(&self, sql: &str) -> SchemaResult<()> {
        self.db
            .execute_batch(sql)
            .await
            .map_err(|e| SchemaError::rejected(self.op, e.to_string()))
    }

    async fn registry(&self, sql: &str) -> SchemaResult<()> {
        self.db
            .execute_batch(sql)
            .await
            .map_err(|e| SchemaError::Metadata(format!("{}: {e}", self.op)))
    }

    async fn run(&self) -> SchemaResult<()> {
        match self.op {
            SchemaOp::CreateTable {
                table,
                columns,
                constraints,
            } => {
                let mut parts: Vec<String> = columns.iter().map(|c| c.to_create_sql()).collect();
                for c in constraints {
                    if let ConstraintKind::Check { expression, .. } = &c.kind {
                        parts.push(format!("CONSTRAINT {} CHECK ({expression})", ident(&c.name)));
                    }
                }
                self.ddl(&format!(
                    "CREATE TABLE {} (\n    {}\n)",
                    ident(table),
                    parts.join(",\n    ")
                ))
                .await?;

                for c in constraints {
                    self.registry(&metadata::insert_constraint_sql(c)).await?;
                }
                for column in columns {
                    if let Some(enum_name) = column.column_type.enum_name() {
                        let binding = Constraint::enum_binding(table, &column.name, enum_name);
                        self.registry(&metadata::insert_constraint_sql(&binding))
                            .await?;
                    }
                }
            }

            SchemaOp::DropTable { table } => {
                self.ddl(&format!("DROP TABLE {}", ident(table))).await?;
                self.registry(&metadata::delete_table_constraints_sql(table))
                    .await?;
            }

            SchemaOp::RenameTable { from, to } => {
                self.ddl(&format!("ALTER TABLE {} RENAME TO {}", ident(from), ident(to)))
                    .await?;
                self.registry(&metadata::rename_table_sql(from, to)).await?;
            }

            SchemaOp::AddColumn { table, column } => {
                let mut sql = format!(
                    "ALTER TABLE {} ADD COLUMN {} {}",
                    ident(table),
                    ident(&column.name),
                    column.column_type.physical_name()
                );
                if let Some(default) = &column.default {
                    sql.push_str(" DEFAULT ");
                    sql.push_str(&default.to_sql());
                }
                self.ddl(&sql).await?;
                if !column.is_nullable() {
                    self.ddl(&format!(
                        "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
                        ident(table),
                        ident(&column.name)
                    ))
                    .await?;
                }
                if let Some(enum_name) = column.column_type.enum_name() {
                    let binding = Constraint::enum_binding(table, &column.name, enum_name);
                    self.registry(&metadata::insert_constraint_sql(&binding))
                        .await?;
                }
            }

            SchemaOp::RemoveColumn { table, column } => {
                self.ddl(&format!(
                    "ALTER TABLE {} DROP COLUMN {}",
                    ident(table),
                    ident(column)
                ))
                .await?;
                if let Some(binding) = self.catalog.enum_binding(table, column) {
                    self.registry(&metadata::delete_constraint_sql(&binding.name))
                        .await?;
                }
            }

            SchemaOp::RenameColumn { table, from, to } => {
                self.ddl(&format!(
                    "ALTER TABLE {} RENAME COLUMN {} TO {}",
                    ident(table),
                    ident(from),
                    ident(to)
                ))
                .await?;
                self.registry(&metadata::rename_column_sql(table, from, to))
                    .await?;
            }

            SchemaOp::ChangeColumnType {
                table,
                column,
                column_type,
            } => {
                if let ColumnType::Enum(enum_name) = column_type {
                    self.ensure_enum_members(table, column, enum_name).await?;
                }
                self.ddl(&format!(
                    "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
                    ident(table),
                    ident(column),
                    column_type.physical_name()
                ))
                .await?;
                if let Some(binding) = self.catalog.enum_binding(table, column) {
                    self.registry(&metadata::delete_constraint_sql(&binding.name))
                        .await?;
                }
                if let Some(enum_name) = column_type.enum_name() {
                    let binding = Constraint::enum_binding(table, column, enum_name);
                    self.registry(&metadata::insert_constraint_sql(&binding))
                        .await?;
                }
            }

            SchemaOp::SetNotNull { table, column } => {
                self.ddl(&format!(
                    "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
                    ident(table),
                    ident(column)
                ))
                .await?;
            }

            SchemaOp::DropNotNull { table, column } => {
                self.ddl(&format!(
                    "ALTER TABLE {} ALTER COLUMN {} DROP NOT NULL",
                    ident(table),
                    ident(column)
                ))
                .await?;
            }

            SchemaOp::SetDefault {
                table,
                column,
                default,
            } => {
                let action = match default {
                    Some(d) => format!("SET DEFAULT {}", d.to_sql()),
                    None => "DROP DEFAULT".to_string(),
                };
                self.ddl(&format!(
                    "ALTER TABLE {} ALTER COLUMN {} {action}",
                    ident(table),
                    ident(column)
                ))
                .await?;
            }

            SchemaOp::AddConstraint(constraint) => {
                self.ensure_satisfied(constraint).await?;
                self.registry(&metadata::insert_constraint_sql(constraint))
                    .await?;
            }

            SchemaOp::DropConstraint { name } => {
                self.registry(&metadata::delete_constraint_sql(name)).await?;
            }

            SchemaOp::CreateEnum { name, values } => {
                self.registry(&metadata::insert_enum_sql(name, values))
                    .await?;
            }

            SchemaOp::AddEnumValue { name, value } => {
                let position = self.catalog.enum_values(name).map_or(0, <[String]>::len);
                self.registry(&metadata::add_enum_value_sql(name, value, position))
                    .await?;
            }

            SchemaOp::DropEnum { name } => {
                self.registry(&metadata::delete_enum_sql(name)).await?;
            }
        }
        Ok(())
    }

    /// Existing rows must already satisfy a constraint before it is recorded.
    async fn ensure_satisfied(&self, constraint: &Constraint) -> SchemaResult<()> {
        let table = ident(&constraint.table);
        let column = ident(constraint.column());
        let violations = match &constraint.kind {
            ConstraintKind::Unique { .. } => {
                self.db
                    .query_count(&format!(
                        "SELECT {column} FROM {table} WHERE {column} IS NOT NULL
                         GROUP BY {column} HAVING COUNT(*) > 1"
                    ))
                    .await?
            }
            ConstraintKind::ForeignKey {
                ref_table,
                ref_column,
                ..
            } => {
                self.db
                    .query_count(&format!(
                        "SELECT 1 FROM {table} AS child WHERE child.{column} IS NOT NULL
                         AND NOT EXISTS (SELECT 1 FROM {} AS parent WHERE parent.{} = child.{column})",
                        ident(ref_table),
                        ident(ref_column)
                    ))
                    .await?
            }
            ConstraintKind::Check { .. } | ConstraintKind::EnumBinding { .. } => 0,
        };
        if violations > 0 {
            return Err(SchemaError::rejected(
                self.op,
                format!("{violations} existing row(s) violate {}", constraint.name),
            ));
        }
        Ok(())
    }

    /// Existing values must all belong to the enum a column is being bound to.
    async fn ensure_enum_members(&self, table: &str, column: &str, enum_name: &str) -> SchemaResult<()> {
        let members: Vec<String> = self
            .catalog
            .enum_values(enum_name)
            .unwrap_or_default()
            .iter()
            .map(|v| lit(v))
            .collect();
        if members.is_empty() {
            return Ok(());
        }
        let outliers = self
            .db
            .query_count(&format!(
                "SELECT 1 FROM {} WHERE {col} IS NOT NULL AND CAST({col} AS VARCHAR) NOT IN ({})",
                ident(table),
                members.join(", "),
                col = ident(column),
            ))
            .await?;
        if outliers > 0 {
            return Err(SchemaError::rejected(
                self.op,
                format!("{outliers} existing value(s) of {table}.{column} are not in enum {enum_name}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
