//! Existence guards for schema operations.
//!
//! Every operation is checked against the current catalog before it runs.
//! A guard either lets the operation through, skips it because its effect
//! is already present, or rejects it because the catalog cannot reach the
//! requested state.

use crate::catalog::Catalog;
use crate::error::{SchemaError, SchemaResult};
use crate::op::SchemaOp;
use crate::types::{ColumnDef, Constraint, ConstraintKind, DefaultValue};
use std::collections::HashSet;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Guard {
    Apply,
    Skip(String),
}

fn skip(reason: impl Into<String>) -> SchemaResult<Guard> {
    Ok(Guard::Skip(reason.into()))
}

/// Decide whether `op` applies to `catalog`.
pub(crate) fn check(catalog: &Catalog, op: &SchemaOp) -> SchemaResult<Guard> {
    let reject = |message: String| -> SchemaResult<Guard> {
        Err(SchemaError::rejected(op, message))
    };

    match op {
        SchemaOp::CreateTable {
            table,
            columns,
            constraints,
        } => {
            if catalog.has_table(table) {
                return skip(format!("table {table} already exists"));
            }
            if columns.is_empty() {
                return reject("a table needs at least one column".to_string());
            }
            let mut names = HashSet::new();
            for column in columns {
                if !names.insert(column.name.as_str()) {
                    return reject(format!("duplicate column {}", column.name));
                }
                if let Some(enum_name) = column.column_type.enum_name() {
                    check_enum_column(catalog, enum_name, column)
                        .map_err(|message| SchemaError::rejected(op, message))?;
                }
            }
            if columns.iter().filter(|c| c.primary_key).count() != 1 {
                return reject("exactly one primary key column is required".to_string());
            }
            for constraint in constraints {
                if constraint.table != *table {
                    return reject(format!(
                        "constraint {} belongs to table {}",
                        constraint.name, constraint.table
                    ));
                }
                if !names.contains(constraint.column()) {
                    return reject(format!(
                        "constraint {} names unknown column {}",
                        constraint.name,
                        constraint.column()
                    ));
                }
                if catalog.constraint(&constraint.name).is_some() {
                    return reject(format!("constraint {} already exists", constraint.name));
                }
                if let ConstraintKind::EnumBinding { .. } = constraint.kind {
                    return reject("enum bindings come from the column type".to_string());
                }
                if let ConstraintKind::ForeignKey {
                    ref_table,
                    ref_column,
                    ..
                } = &constraint.kind
                {
                    let self_ref = ref_table == table && names.contains(ref_column.as_str());
                    if !self_ref && catalog.column(ref_table, ref_column).is_none() {
                        return reject(format!(
                            "foreign key {} references missing {ref_table}.{ref_column}",
                            constraint.name
                        ));
                    }
                }
            }
            Ok(Guard::Apply)
        }

        SchemaOp::DropTable { table } => {
            if !catalog.has_table(table) {
                return skip(format!("table {table} does not exist"));
            }
            if let Some(fk) = catalog
                .constraints
                .values()
                .find(|c| c.references_table(table))
            {
                return reject(format!(
                    "table {table} is referenced by {} on {}",
                    fk.name, fk.table
                ));
            }
            Ok(Guard::Apply)
        }

        SchemaOp::RenameTable { from, to } => {
            match (catalog.has_table(from), catalog.has_table(to)) {
                (true, false) => Ok(Guard::Apply),
                (true, true) => reject(format!("both {from} and {to} exist")),
                (false, true) => skip(format!("table already renamed to {to}")),
                (false, false) => reject(format!("neither {from} nor {to} exists")),
            }
        }

        SchemaOp::AddColumn { table, column } => {
            if !catalog.has_table(table) {
                return reject(format!("table {table} does not exist"));
            }
            if catalog.column(table, &column.name).is_some() {
                return skip(format!("column {table}.{} already exists", column.name));
            }
            if column.primary_key {
                return reject("a primary key cannot be added to an existing table".to_string());
            }
            if let Some(enum_name) = column.column_type.enum_name() {
                check_enum_column(catalog, enum_name, column)
                    .map_err(|message| SchemaError::rejected(op, message))?;
                let binding = Constraint::enum_binding(table, &column.name, enum_name);
                if catalog.constraint(&binding.name).is_some() {
                    return reject(format!("constraint {} already exists", binding.name));
                }
            }
            Ok(Guard::Apply)
        }

        SchemaOp::RemoveColumn { table, column } => {
            if !catalog.has_table(table) {
                return reject(format!("table {table} does not exist"));
            }
            if catalog.column(table, column).is_none() {
                return skip(format!("column {table}.{column} does not exist"));
            }
            if catalog.table(table).map_or(0, |t| t.columns.len()) <= 1 {
                return reject(format!("{table}.{column} is the last column"));
            }
            if column == "id" {
                return reject(format!("{table}.{column} is the primary key"));
            }
            if let Some(c) = catalog.constraints.values().find(|c| {
                c.involves(table, column) && !matches!(c.kind, ConstraintKind::EnumBinding { .. })
            }) {
                return reject(format!("{table}.{column} is used by constraint {}", c.name));
            }
            Ok(Guard::Apply)
        }

        SchemaOp::RenameColumn { table, from, to } => {
            if !catalog.has_table(table) {
                return reject(format!("table {table} does not exist"));
            }
            let has_from = catalog.column(table, from).is_some();
            let has_to = catalog.column(table, to).is_some();
            match (has_from, has_to) {
                (true, false) => {
                    if from == "id" {
                        return reject(format!("{table}.{from} is the primary key"));
                    }
                    if let Some(c) = catalog.constraints_on(table).find(|c| {
                        matches!(&c.kind, ConstraintKind::Check { column, .. } if column == from)
                    }) {
                        return reject(format!("{table}.{from} is used by check {}", c.name));
                    }
                    Ok(Guard::Apply)
                }
                (true, true) => reject(format!("both {table}.{from} and {table}.{to} exist")),
                (false, true) => skip(format!("column already renamed to {table}.{to}")),
                (false, false) => reject(format!("neither {table}.{from} nor {table}.{to} exists")),
            }
        }

        SchemaOp::ChangeColumnType {
            table,
            column,
            column_type,
        } => {
            let Some(shape) = catalog.column(table, column) else {
                return reject(format!("column {table}.{column} does not exist"));
            };
            if column == "id" {
                return reject(format!("{table}.{column} is the primary key"));
            }
            if let Some(enum_name) = column_type.enum_name() {
                if catalog.enum_values(enum_name).is_none() {
                    return reject(format!("enum {enum_name} does not exist"));
                }
            }
            let current_binding = catalog.enum_binding(table, column).map(|c| match &c.kind {
                ConstraintKind::EnumBinding { enum_name, .. } => enum_name.as_str(),
                _ => "",
            });
            if shape.data_type == column_type.physical_name()
                && current_binding == column_type.enum_name()
            {
                return skip(format!("{table}.{column} already has type {column_type}"));
            }
            if let Some(c) = catalog.constraints.values().find(|c| {
                c.involves(table, column) && !matches!(c.kind, ConstraintKind::EnumBinding { .. })
            }) {
                return reject(format!("{table}.{column} is used by constraint {}", c.name));
            }
            Ok(Guard::Apply)
        }

        SchemaOp::SetNotNull { table, column } => match catalog.column(table, column) {
            None => reject(format!("column {table}.{column} does not exist")),
            Some(shape) if !shape.nullable => skip(format!("{table}.{column} is already NOT NULL")),
            Some(_) => Ok(Guard::Apply),
        },

        SchemaOp::DropNotNull { table, column } => match catalog.column(table, column) {
            None => reject(format!("column {table}.{column} does not exist")),
            Some(_) if column == "id" => reject(format!("{table}.{column} is the primary key")),
            Some(shape) if shape.nullable => skip(format!("{table}.{column} is already nullable")),
            Some(_) => Ok(Guard::Apply),
        },

        SchemaOp::SetDefault {
            table,
            column,
            default,
        } => {
            if catalog.column(table, column).is_none() {
                return reject(format!("column {table}.{column} does not exist"));
            }
            if let (Some(DefaultValue::Text(value)), Some(binding)) =
                (default, catalog.enum_binding(table, column))
            {
                if let ConstraintKind::EnumBinding { enum_name, .. } = &binding.kind {
                    let members = catalog.enum_values(enum_name).unwrap_or_default();
                    if !members.iter().any(|m| m == value) {
                        return reject(format!("'{value}' is not a value of enum {enum_name}"));
                    }
                }
            }
            Ok(Guard::Apply)
        }

        SchemaOp::AddConstraint(constraint) => {
            if catalog.constraint(&constraint.name).is_some() {
                return skip(format!("constraint {} already exists", constraint.name));
            }
            match &constraint.kind {
                ConstraintKind::Check { .. } => {
                    return reject("check constraints are declared with CREATE TABLE".to_string())
                }
                ConstraintKind::EnumBinding { .. } => {
                    return reject("enum bindings come from the column type".to_string())
                }
                _ => {}
            }
            if catalog.column(&constraint.table, constraint.column()).is_none() {
                return reject(format!(
                    "column {}.{} does not exist",
                    constraint.table,
                    constraint.column()
                ));
            }
            if let ConstraintKind::ForeignKey {
                ref_table,
                ref_column,
                ..
            } = &constraint.kind
            {
                if catalog.column(ref_table, ref_column).is_none() {
                    return reject(format!("referenced {ref_table}.{ref_column} does not exist"));
                }
            }
            Ok(Guard::Apply)
        }

        SchemaOp::DropConstraint { name } => match catalog.constraint(name) {
            None => skip(format!("constraint {name} does not exist")),
            Some(c) => match c.kind {
                ConstraintKind::Check { .. } => {
                    reject("check constraints are dropped with their table".to_string())
                }
                ConstraintKind::EnumBinding { .. } => {
                    reject("enum bindings follow the column type".to_string())
                }
                _ => Ok(Guard::Apply),
            },
        },

        SchemaOp::CreateEnum { name, values } => {
            if catalog.enum_values(name).is_some() {
                return skip(format!("enum {name} already exists"));
            }
            if values.is_empty() {
                return reject(format!("enum {name} needs at least one value"));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = values.iter().find(|v| !seen.insert(v.as_str())) {
                return reject(format!("duplicate value '{dup}'"));
            }
            Ok(Guard::Apply)
        }

        SchemaOp::AddEnumValue { name, value } => match catalog.enum_values(name) {
            None => reject(format!("enum {name} does not exist")),
            Some(values) if values.iter().any(|v| v == value) => {
                skip(format!("enum {name} already has '{value}'"))
            }
            Some(_) => Ok(Guard::Apply),
        },

        SchemaOp::DropEnum { name } => {
            if catalog.enum_values(name).is_none() {
                return skip(format!("enum {name} does not exist"));
            }
            if let Some(binding) = catalog.constraints.values().find(|c| {
                matches!(&c.kind, ConstraintKind::EnumBinding { enum_name, .. } if enum_name == name)
            }) {
                return reject(format!(
                    "enum {name} is used by {}.{}",
                    binding.table,
                    binding.column()
                ));
            }
            Ok(Guard::Apply)
        }
    }
}

/// An enum-typed column needs an existing domain, and a text default must
/// be one of its members.
fn check_enum_column(catalog: &Catalog, enum_name: &str, column: &ColumnDef) -> Result<(), String> {
    let Some(members) = catalog.enum_values(enum_name) else {
        return Err(format!("enum {enum_name} does not exist"));
    };
    if let Some(DefaultValue::Text(value)) = &column.default {
        if !members.iter().any(|m| m == value) {
            return Err(format!("default '{value}' is not a value of enum {enum_name}"));
        }
    }
    Ok(())
}
