//! Schema operations: the vocabulary migration units are written in.

use crate::types::{ColumnDef, ColumnType, Constraint, DefaultValue};
use std::fmt;

/// One schema mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOp {
    CreateTable {
        table: String,
        columns: Vec<ColumnDef>,
        constraints: Vec<Constraint>,
    },
    DropTable {
        table: String,
    },
    RenameTable {
        from: String,
        to: String,
    },
    AddColumn {
        table: String,
        column: ColumnDef,
    },
    RemoveColumn {
        table: String,
        column: String,
    },
    RenameColumn {
        table: String,
        from: String,
        to: String,
    },
    ChangeColumnType {
        table: String,
        column: String,
        column_type: ColumnType,
    },
    SetNotNull {
        table: String,
        column: String,
    },
    DropNotNull {
        table: String,
        column: String,
    },
    SetDefault {
        table: String,
        column: String,
        default: Option<DefaultValue>,
    },
    AddConstraint(Constraint),
    DropConstraint {
        name: String,
    },
    CreateEnum {
        name: String,
        values: Vec<String>,
    },
    /// Append-only: the store cannot remove enum values.
    AddEnumValue {
        name: String,
        value: String,
    },
    DropEnum {
        name: String,
    },
}

impl SchemaOp {
    pub fn create_table(
        table: &str,
        columns: impl IntoIterator<Item = ColumnDef>,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        SchemaOp::CreateTable {
            table: table.to_string(),
            columns: columns.into_iter().collect(),
            constraints: constraints.into_iter().collect(),
        }
    }

    pub fn drop_table(table: &str) -> Self {
        SchemaOp::DropTable {
            table: table.to_string(),
        }
    }

    pub fn rename_table(from: &str, to: &str) -> Self {
        SchemaOp::RenameTable {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn add_column(table: &str, column: ColumnDef) -> Self {
        SchemaOp::AddColumn {
            table: table.to_string(),
            column,
        }
    }

    pub fn remove_column(table: &str, column: &str) -> Self {
        SchemaOp::RemoveColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn rename_column(table: &str, from: &str, to: &str) -> Self {
        SchemaOp::RenameColumn {
            table: table.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn change_column_type(table: &str, column: &str, column_type: ColumnType) -> Self {
        SchemaOp::ChangeColumnType {
            table: table.to_string(),
            column: column.to_string(),
            column_type,
        }
    }

    pub fn set_not_null(table: &str, column: &str) -> Self {
        SchemaOp::SetNotNull {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn drop_not_null(table: &str, column: &str) -> Self {
        SchemaOp::DropNotNull {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn set_default(table: &str, column: &str, default: Option<DefaultValue>) -> Self {
        SchemaOp::SetDefault {
            table: table.to_string(),
            column: column.to_string(),
            default,
        }
    }

    pub fn add_constraint(constraint: Constraint) -> Self {
        SchemaOp::AddConstraint(constraint)
    }

    pub fn drop_constraint(name: &str) -> Self {
        SchemaOp::DropConstraint {
            name: name.to_string(),
        }
    }

    pub fn create_enum(name: &str, values: &[&str]) -> Self {
        SchemaOp::CreateEnum {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn add_enum_value(name: &str, value: &str) -> Self {
        SchemaOp::AddEnumValue {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn drop_enum(name: &str) -> Self {
        SchemaOp::DropEnum {
            name: name.to_string(),
        }
    }
}

impl fmt::Display for SchemaOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaOp::CreateTable { table, .. } => write!(f, "create table {table}"),
            SchemaOp::DropTable { table } => write!(f, "drop table {table}"),
            SchemaOp::RenameTable { from, to } => write!(f, "rename table {from} to {to}"),
            SchemaOp::AddColumn { table, column } => {
                write!(f, "add column {table}.{}", column.name)
            }
            SchemaOp::RemoveColumn { table, column } => write!(f, "remove column {table}.{column}"),
            SchemaOp::RenameColumn { table, from, to } => {
                write!(f, "rename column {table}.{from} to {to}")
            }
            SchemaOp::ChangeColumnType {
                table,
                column,
                column_type,
            } => write!(f, "change type of {table}.{column} to {column_type}"),
            SchemaOp::SetNotNull { table, column } => write!(f, "set not null on {table}.{column}"),
            SchemaOp::DropNotNull { table, column } => {
                write!(f, "drop not null on {table}.{column}")
            }
            SchemaOp::SetDefault { table, column, .. } => {
                write!(f, "set default on {table}.{column}")
            }
            SchemaOp::AddConstraint(c) => write!(f, "add constraint {}", c.name),
            SchemaOp::DropConstraint { name } => write!(f, "drop constraint {name}"),
            SchemaOp::CreateEnum { name, .. } => write!(f, "create enum {name}"),
            SchemaOp::AddEnumValue { name, value } => write!(f, "add value '{value}' to enum {name}"),
            SchemaOp::DropEnum { name } => write!(f, "drop enum {name}"),
        }
    }
}
