//! Column types, column definitions, and named constraints.

use serde::Serialize;
use std::fmt;

/// Logical column type.
///
/// Enum columns are stored as `VARCHAR` and bound to a named enum domain
/// through an [`ConstraintKind::EnumBinding`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "arg", rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    Integer,
    BigInt,
    Double,
    Boolean,
    Timestamp,
    Date,
    Decimal { precision: u8, scale: u8 },
    TextList,
    Enum(String),
}

impl ColumnType {
    pub fn decimal(precision: u8, scale: u8) -> Self {
        ColumnType::Decimal { precision, scale }
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        ColumnType::Enum(name.into())
    }

    /// Canonical type name as the store reports it in `information_schema`.
    pub fn physical_name(&self) -> String {
        match self {
            ColumnType::Text | ColumnType::Enum(_) => "VARCHAR".to_string(),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInt => "BIGINT".to_string(),
            ColumnType::Double => "DOUBLE".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            ColumnType::TextList => "VARCHAR[]".to_string(),
        }
    }

    /// Name of the bound enum domain, if any.
    pub fn enum_name(&self) -> Option<&str> {
        match self {
            ColumnType::Enum(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Enum(name) => write!(f, "ENUM({name})"),
            other => f.write_str(&other.physical_name()),
        }
    }
}

/// Column default expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    Text(String),
    Int(i64),
    Bool(bool),
    CurrentTimestamp,
}

impl DefaultValue {
    pub fn text(value: impl Into<String>) -> Self {
        DefaultValue::Text(value.into())
    }

    pub fn to_sql(&self) -> String {
        match self {
            DefaultValue::Text(s) => al_db::quote_literal(s),
            DefaultValue::Int(n) => n.to_string(),
            DefaultValue::Bool(true) => "TRUE".to_string(),
            DefaultValue::Bool(false) => "FALSE".to_string(),
            DefaultValue::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
        }
    }
}

/// A column as declared by a migration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub default: Option<DefaultValue>,
    pub primary_key: bool,
}

impl ColumnDef {
    /// A nullable column without default.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
            primary_key: false,
        }
    }

    /// The `id VARCHAR` primary key every table carries.
    pub fn id() -> Self {
        Self {
            primary_key: true,
            nullable: false,
            ..Self::new("id", ColumnType::Text)
        }
    }

    /// `created_at` / `updated_at`, both required.
    pub fn timestamps() -> [Self; 2] {
        [
            Self::new("created_at", ColumnType::Timestamp).not_null(),
            Self::new("updated_at", ColumnType::Timestamp).not_null(),
        ]
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Whether the store reports this column as nullable.
    pub fn is_nullable(&self) -> bool {
        self.nullable && !self.primary_key
    }

    /// Column definition as used inside `CREATE TABLE`.
    ///
    /// Primary keys are emitted as `NOT NULL` only. DuckDB refuses most
    /// `ALTER TABLE` forms on indexed tables, so key uniqueness is enforced
    /// by the writer instead.
    pub(crate) fn to_create_sql(&self) -> String {
        let mut sql = format!(
            "{} {}",
            al_db::quote_ident(&self.name),
            self.column_type.physical_name()
        );
        if !self.is_nullable() {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.to_sql());
        }
        sql
    }
}

/// Referential action taken on child rows when a parent row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    Cascade,
    Restrict,
    SetNull,
}

impl OnDelete {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "cascade",
            OnDelete::Restrict => "restrict",
            OnDelete::SetNull => "set_null",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cascade" => Some(OnDelete::Cascade),
            "restrict" => Some(OnDelete::Restrict),
            "set_null" => Some(OnDelete::SetNull),
            _ => None,
        }
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a named constraint enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintKind {
    Unique {
        column: String,
    },
    ForeignKey {
        column: String,
        ref_table: String,
        ref_column: String,
        on_delete: OnDelete,
    },
    Check {
        column: String,
        expression: String,
    },
    EnumBinding {
        column: String,
        enum_name: String,
    },
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Unique { .. } => "unique",
            ConstraintKind::ForeignKey { .. } => "foreign_key",
            ConstraintKind::Check { .. } => "check",
            ConstraintKind::EnumBinding { .. } => "enum",
        }
    }

    /// The constrained column on the owning table.
    pub fn column(&self) -> &str {
        match self {
            ConstraintKind::Unique { column }
            | ConstraintKind::ForeignKey { column, .. }
            | ConstraintKind::Check { column, .. }
            | ConstraintKind::EnumBinding { column, .. } => column,
        }
    }

    pub(crate) fn column_mut(&mut self) -> &mut String {
        match self {
            ConstraintKind::Unique { column }
            | ConstraintKind::ForeignKey { column, .. }
            | ConstraintKind::Check { column, .. }
            | ConstraintKind::EnumBinding { column, .. } => column,
        }
    }
}

/// A named constraint on one column of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    pub name: String,
    pub table: String,
    #[serde(flatten)]
    pub kind: ConstraintKind,
}

impl Constraint {
    /// `UNIQUE(column)` named `<table>_<column>_key`.
    pub fn unique(table: &str, column: &str) -> Self {
        Self {
            name: format!("{table}_{column}_key"),
            table: table.to_string(),
            kind: ConstraintKind::Unique {
                column: column.to_string(),
            },
        }
    }

    /// `FOREIGN KEY(column) REFERENCES ref_table(id)` named `<table>_<column>_fkey`.
    pub fn foreign_key(table: &str, column: &str, ref_table: &str, on_delete: OnDelete) -> Self {
        Self {
            name: format!("{table}_{column}_fkey"),
            table: table.to_string(),
            kind: ConstraintKind::ForeignKey {
                column: column.to_string(),
                ref_table: ref_table.to_string(),
                ref_column: "id".to_string(),
                on_delete,
            },
        }
    }

    /// `CHECK(expression)` over a single column.
    pub fn check(name: &str, table: &str, column: &str, expression: &str) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            kind: ConstraintKind::Check {
                column: column.to_string(),
                expression: expression.to_string(),
            },
        }
    }

    /// Binding of an enum-typed column to its domain.
    pub fn enum_binding(table: &str, column: &str, enum_name: &str) -> Self {
        Self {
            name: format!("{table}_{column}_enum"),
            table: table.to_string(),
            kind: ConstraintKind::EnumBinding {
                column: column.to_string(),
                enum_name: enum_name.to_string(),
            },
        }
    }

    pub fn column(&self) -> &str {
        self.kind.column()
    }

    /// Whether this constraint mentions `table.column`, on either side.
    pub fn involves(&self, table: &str, column: &str) -> bool {
        if self.table == table && self.column() == column {
            return true;
        }
        matches!(
            &self.kind,
            ConstraintKind::ForeignKey { ref_table, ref_column, .. }
                if ref_table == table && ref_column == column
        )
    }

    /// Whether this is a foreign key pointing at `table` from another table.
    pub fn references_table(&self, table: &str) -> bool {
        matches!(
            &self.kind,
            ConstraintKind::ForeignKey { ref_table, .. } if ref_table == table
        ) && self.table != table
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
