//! The schema catalog: tables, columns, constraints, and enum domains.
//!
//! A [`Catalog`] is produced two ways: by folding migration units in memory
//! ([`Catalog::from_units`]) and by introspecting a live store
//! ([`crate::SchemaIntrospect::snapshot`]). Both must agree after every
//! unit has been applied.

use crate::error::{SchemaError, SchemaResult};
use crate::executor::OpOutcome;
use crate::guard::{check, Guard};
use crate::migration::Migration;
use crate::op::SchemaOp;
use crate::types::{ColumnDef, Constraint, ConstraintKind};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Shape of one column as the store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnShape {
    pub data_type: String,
    pub nullable: bool,
    pub has_default: bool,
}

impl From<&ColumnDef> for ColumnShape {
    fn from(def: &ColumnDef) -> Self {
        Self {
            data_type: def.column_type.physical_name(),
            nullable: def.is_nullable(),
            has_default: def.default.is_some(),
        }
    }
}

/// Columns of one table, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableShape {
    pub columns: BTreeMap<String, ColumnShape>,
}

/// Cumulative schema state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub tables: BTreeMap<String, TableShape>,
    pub constraints: BTreeMap<String, Constraint>,
    pub enums: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the `up` operations of every unit, in the order given.
    pub fn from_units<'a>(units: impl IntoIterator<Item = &'a Migration>) -> SchemaResult<Self> {
        let mut catalog = Self::new();
        for unit in units {
            for op in unit.up() {
                catalog.apply(op).map_err(|e| SchemaError::UnitFailed {
                    migration: unit.id().to_string(),
                    source: Box::new(e),
                })?;
            }
        }
        Ok(catalog)
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn table(&self, table: &str) -> Option<&TableShape> {
        self.tables.get(table)
    }

    pub fn column(&self, table: &str, column: &str) -> Option<&ColumnShape> {
        self.tables.get(table).and_then(|t| t.columns.get(column))
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.get(name)
    }

    /// Constraints owned by `table`.
    pub fn constraints_on<'a, 'b>(
        &'a self,
        table: &'b str,
    ) -> impl Iterator<Item = &'a Constraint> + 'b
    where
        'a: 'b,
    {
        self.constraints.values().filter(move |c| c.table == table)
    }

    /// Enum binding of `table.column`, if the column is enum-typed.
    pub fn enum_binding(&self, table: &str, column: &str) -> Option<&Constraint> {
        self.constraints.values().find(|c| {
            c.table == table
                && matches!(&c.kind, ConstraintKind::EnumBinding { column: col, .. } if col == column)
        })
    }

    pub fn enum_values(&self, name: &str) -> Option<&[String]> {
        self.enums.get(name).map(Vec::as_slice)
    }

    /// Apply one operation with the same guards the live store uses.
    pub fn apply(&mut self, op: &SchemaOp) -> SchemaResult<OpOutcome> {
        match check(self, op)? {
            Guard::Skip(reason) => return Ok(OpOutcome::Skipped(reason)),
            Guard::Apply => {}
        }

        match op {
            SchemaOp::CreateTable {
                table,
                columns,
                constraints,
            } => {
                let shape = TableShape {
                    columns: columns
                        .iter()
                        .map(|c| (c.name.clone(), ColumnShape::from(c)))
                        .collect(),
                };
                self.tables.insert(table.clone(), shape);
                for constraint in constraints {
                    self.insert_constraint(constraint.clone());
                }
                for column in columns {
                    if let Some(enum_name) = column.column_type.enum_name() {
                        self.insert_constraint(Constraint::enum_binding(
                            table,
                            &column.name,
                            enum_name,
                        ));
                    }
                }
            }
            SchemaOp::DropTable { table } => {
                self.tables.remove(table);
                self.constraints.retain(|_, c| &c.table != table);
            }
            SchemaOp::RenameTable { from, to } => {
                if let Some(shape) = self.tables.remove(from) {
                    self.tables.insert(to.clone(), shape);
                }
                for constraint in self.constraints.values_mut() {
                    if &constraint.table == from {
                        constraint.table = to.clone();
                    }
                    if let ConstraintKind::ForeignKey { ref_table, .. } = &mut constraint.kind {
                        if ref_table == from {
                            *ref_table = to.clone();
                        }
                    }
                }
            }
            SchemaOp::AddColumn { table, column } => {
                if let Some(shape) = self.tables.get_mut(table) {
                    shape
                        .columns
                        .insert(column.name.clone(), ColumnShape::from(column));
                }
                if let Some(enum_name) = column.column_type.enum_name() {
                    self.insert_constraint(Constraint::enum_binding(table, &column.name, enum_name));
                }
            }
            SchemaOp::RemoveColumn { table, column } => {
                if let Some(shape) = self.tables.get_mut(table) {
                    shape.columns.remove(column);
                }
                self.remove_enum_binding(table, column);
            }
            SchemaOp::RenameColumn { table, from, to } => {
                if let Some(shape) = self.tables.get_mut(table) {
                    if let Some(col) = shape.columns.remove(from) {
                        shape.columns.insert(to.clone(), col);
                    }
                }
                for constraint in self.constraints.values_mut() {
                    if &constraint.table == table && constraint.column() == from {
                        *constraint.kind.column_mut() = to.clone();
                    }
                    if let ConstraintKind::ForeignKey {
                        ref_table,
                        ref_column,
                        ..
                    } = &mut constraint.kind
                    {
                        if ref_table == table && ref_column == from {
                            *ref_column = to.clone();
                        }
                    }
                }
            }
            SchemaOp::ChangeColumnType {
                table,
                column,
                column_type,
            } => {
                if let Some(col) = self
                    .tables
                    .get_mut(table)
                    .and_then(|t| t.columns.get_mut(column))
                {
                    col.data_type = column_type.physical_name();
                }
                self.remove_enum_binding(table, column);
                if let Some(enum_name) = column_type.enum_name() {
                    self.insert_constraint(Constraint::enum_binding(table, column, enum_name));
                }
            }
            SchemaOp::SetNotNull { table, column } => self.set_nullable(table, column, false),
            SchemaOp::DropNotNull { table, column } => self.set_nullable(table, column, true),
            SchemaOp::SetDefault {
                table,
                column,
                default,
            } => {
                if let Some(col) = self
                    .tables
                    .get_mut(table)
                    .and_then(|t| t.columns.get_mut(column))
                {
                    col.has_default = default.is_some();
                }
            }
            SchemaOp::AddConstraint(constraint) => self.insert_constraint(constraint.clone()),
            SchemaOp::DropConstraint { name } => {
                self.constraints.remove(name);
            }
            SchemaOp::CreateEnum { name, values } => {
                self.enums.insert(name.clone(), values.clone());
            }
            SchemaOp::AddEnumValue { name, value } => {
                if let Some(values) = self.enums.get_mut(name) {
                    values.push(value.clone());
                }
            }
            SchemaOp::DropEnum { name } => {
                self.enums.remove(name);
            }
        }
        Ok(OpOutcome::Applied)
    }

    fn insert_constraint(&mut self, constraint: Constraint) {
        self.constraints.insert(constraint.name.clone(), constraint);
    }

    fn remove_enum_binding(&mut self, table: &str, column: &str) {
        if let Some(name) = self.enum_binding(table, column).map(|c| c.name.clone()) {
            self.constraints.remove(&name);
        }
    }

    fn set_nullable(&mut self, table: &str, column: &str, nullable: bool) {
        if let Some(col) = self
            .tables
            .get_mut(table)
            .and_then(|t| t.columns.get_mut(column))
        {
            col.nullable = nullable;
        }
    }

    /// Tables ordered so that every foreign-key target precedes the tables
    /// referencing it.
    pub fn table_order(&self) -> SchemaResult<Vec<String>> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
        for table in self.tables.keys() {
            nodes.insert(table, graph.add_node(table));
        }
        for constraint in self.constraints.values() {
            if let ConstraintKind::ForeignKey { ref_table, .. } = &constraint.kind {
                if ref_table == &constraint.table {
                    continue;
                }
                if let (Some(&parent), Some(&child)) = (
                    nodes.get(ref_table.as_str()),
                    nodes.get(constraint.table.as_str()),
                ) {
                    graph.add_edge(parent, child, ());
                }
            }
        }

        toposort(&graph, None)
            .map(|order| order.into_iter().map(|idx| graph[idx].to_string()).collect())
            .map_err(|cycle| SchemaError::CircularDependency(graph[cycle.node_id()].to_string()))
    }

    /// Copy of this catalog with enum values removed, for comparisons that
    /// must ignore grow-only enum domains.
    pub fn without_enum_values(&self) -> Self {
        Self {
            tables: self.tables.clone(),
            constraints: self.constraints.clone(),
            enums: self
                .enums
                .keys()
                .map(|name| (name.clone(), Vec::new()))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
