//! The `al_meta` registry.
//!
//! DuckDB does not enforce cascading foreign keys and cannot attach
//! constraints through `ALTER TABLE`, so unique, foreign-key, check, and
//! enum-binding constraints are recorded here alongside the enum domains.
//! The executor keeps the registry in step with the DDL it issues, inside
//! the same transaction.

use crate::error::{SchemaError, SchemaResult};
use crate::types::{Constraint, ConstraintKind, OnDelete};
use al_db::{quote_literal as lit, Database, Row};
use std::collections::BTreeMap;

/// Schema holding migration bookkeeping.
pub const META_SCHEMA: &str = "al_meta";

const BOOTSTRAP_SQL: &str = "CREATE SCHEMA IF NOT EXISTS al_meta;
CREATE TABLE IF NOT EXISTS al_meta.schema_migrations (
    version     VARCHAR NOT NULL,
    description VARCHAR NOT NULL,
    applied_at  TIMESTAMP NOT NULL DEFAULT now()
);
CREATE TABLE IF NOT EXISTS al_meta.constraints (
    name        VARCHAR NOT NULL,
    kind        VARCHAR NOT NULL,
    table_name  VARCHAR NOT NULL,
    column_name VARCHAR NOT NULL,
    ref_table   VARCHAR,
    ref_column  VARCHAR,
    on_delete   VARCHAR,
    detail      VARCHAR
);
CREATE TABLE IF NOT EXISTS al_meta.enum_values (
    enum_name VARCHAR NOT NULL,
    value     VARCHAR NOT NULL,
    position  INTEGER NOT NULL
);";

/// Ensure the metadata schema and its tables exist.
pub async fn ensure(db: &dyn Database) -> SchemaResult<()> {
    db.execute_batch(BOOTSTRAP_SQL)
        .await
        .map_err(|e| SchemaError::Metadata(format!("failed to create {META_SCHEMA}: {e}")))
}

/// Every registered constraint.
pub async fn read_constraints(db: &dyn Database) -> SchemaResult<Vec<Constraint>> {
    let rows = db
        .query_rows(
            "SELECT name, kind, table_name, column_name, ref_table, ref_column, on_delete, detail
             FROM al_meta.constraints ORDER BY name",
        )
        .await?;
    rows.iter().map(constraint_from_row).collect()
}

fn constraint_from_row(row: &Row) -> SchemaResult<Constraint> {
    let field = |name: &str| -> SchemaResult<String> {
        row.text(name)
            .map(str::to_string)
            .ok_or_else(|| SchemaError::Metadata(format!("constraint row missing {name}")))
    };
    let name = field("name")?;
    let table = field("table_name")?;
    let column = field("column_name")?;
    let kind = match field("kind")?.as_str() {
        "unique" => ConstraintKind::Unique { column },
        "foreign_key" => {
            let raw = field("on_delete")?;
            let on_delete = OnDelete::parse(&raw).ok_or_else(|| {
                SchemaError::Metadata(format!("constraint {name}: unknown on_delete '{raw}'"))
            })?;
            ConstraintKind::ForeignKey {
                column,
                ref_table: field("ref_table")?,
                ref_column: field("ref_column")?,
                on_delete,
            }
        }
        "check" => ConstraintKind::Check {
            column,
            expression: field("detail")?,
        },
        "enum" => ConstraintKind::EnumBinding {
            column,
            enum_name: field("detail")?,
        },
        other => {
            return Err(SchemaError::Metadata(format!(
                "constraint {name}: unknown kind '{other}'"
            )))
        }
    };
    Ok(Constraint { name, table, kind })
}

/// Every enum domain with its values in declaration order.
pub async fn read_enums(db: &dyn Database) -> SchemaResult<BTreeMap<String, Vec<String>>> {
    let rows = db
        .query_rows("SELECT enum_name, value FROM al_meta.enum_values ORDER BY enum_name, position")
        .await?;
    let mut enums: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in &rows {
        match (row.text("enum_name"), row.text("value")) {
            (Some(name), Some(value)) => enums
                .entry(name.to_string())
                .or_default()
                .push(value.to_string()),
            _ => return Err(SchemaError::Metadata("malformed enum_values row".to_string())),
        }
    }
    Ok(enums)
}

fn opt(value: Option<&str>) -> String {
    value.map_or_else(|| "NULL".to_string(), lit)
}

pub(crate) fn insert_constraint_sql(c: &Constraint) -> String {
    let (ref_table, ref_column, on_delete, detail) = match &c.kind {
        ConstraintKind::Unique { .. } => (None, None, None, None),
        ConstraintKind::ForeignKey {
            ref_table,
            ref_column,
            on_delete,
            ..
        } => (
            Some(ref_table.as_str()),
            Some(ref_column.as_str()),
            Some(on_delete.as_str()),
            None,
        ),
        ConstraintKind::Check { expression, .. } => (None, None, None, Some(expression.as_str())),
        ConstraintKind::EnumBinding { enum_name, .. } => {
            (None, None, None, Some(enum_name.as_str()))
        }
    };
    format!(
        "INSERT INTO al_meta.constraints VALUES ({}, {}, {}, {}, {}, {}, {}, {})",
        lit(&c.name),
        lit(c.kind.as_str()),
        lit(&c.table),
        lit(c.column()),
        opt(ref_table),
        opt(ref_column),
        opt(on_delete),
        opt(detail),
    )
}

pub(crate) fn delete_constraint_sql(name: &str) -> String {
    format!("DELETE FROM al_meta.constraints WHERE name = {}", lit(name))
}

pub(crate) fn delete_table_constraints_sql(table: &str) -> String {
    format!(
        "DELETE FROM al_meta.constraints WHERE table_name = {}",
        lit(table)
    )
}

pub(crate) fn rename_table_sql(from: &str, to: &str) -> String {
    format!(
        "UPDATE al_meta.constraints SET table_name = {to} WHERE table_name = {from};
         UPDATE al_meta.constraints SET ref_table = {to} WHERE ref_table = {from};",
        from = lit(from),
        to = lit(to),
    )
}

pub(crate) fn rename_column_sql(table: &str, from: &str, to: &str) -> String {
    format!(
        "UPDATE al_meta.constraints SET column_name = {to}
         WHERE table_name = {table} AND column_name = {from};
         UPDATE al_meta.constraints SET ref_column = {to}
         WHERE ref_table = {table} AND ref_column = {from};",
        table = lit(table),
        from = lit(from),
        to = lit(to),
    )
}

pub(crate) fn insert_enum_sql(name: &str, values: &[String]) -> String {
    let rows: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("({}, {}, {i})", lit(name), lit(v)))
        .collect();
    format!("INSERT INTO al_meta.enum_values VALUES {}", rows.join(", "))
}

pub(crate) fn add_enum_value_sql(name: &str, value: &str, position: usize) -> String {
    format!(
        "INSERT INTO al_meta.enum_values VALUES ({}, {}, {position})",
        lit(name),
        lit(value)
    )
}

pub(crate) fn delete_enum_sql(name: &str) -> String {
    format!(
        "DELETE FROM al_meta.enum_values WHERE enum_name = {}",
        lit(name)
    )
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
