//! Live schema introspection.

use crate::catalog::{Catalog, ColumnShape, TableShape};
use crate::error::{SchemaError, SchemaResult};
use crate::metadata;
use al_db::Database;
use async_trait::async_trait;

/// Read access to the schema a store currently has.
#[async_trait]
pub trait SchemaIntrospect: Send + Sync {
    /// Full snapshot: user tables and columns plus registered constraints
    /// and enum domains.
    async fn snapshot(&self) -> SchemaResult<Catalog>;

    async fn has_table(&self, table: &str) -> SchemaResult<bool> {
        Ok(self.snapshot().await?.has_table(table))
    }

    async fn has_column(&self, table: &str, column: &str) -> SchemaResult<bool> {
        Ok(self.snapshot().await?.column(table, column).is_some())
    }

    async fn has_constraint(&self, name: &str) -> SchemaResult<bool> {
        Ok(self.snapshot().await?.constraint(name).is_some())
    }

    async fn has_enum(&self, name: &str) -> SchemaResult<bool> {
        Ok(self.snapshot().await?.enum_values(name).is_some())
    }

    async fn enum_values(&self, name: &str) -> SchemaResult<Option<Vec<String>>> {
        Ok(self.snapshot().await?.enums.remove(name))
    }
}

/// Introspection backed by `information_schema` and the `al_meta` registry.
pub struct LiveSchema<'a> {
    db: &'a dyn Database,
}

impl<'a> LiveSchema<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SchemaIntrospect for LiveSchema<'_> {
    async fn snapshot(&self) -> SchemaResult<Catalog> {
        let mut catalog = Catalog::new();

        let tables = self
            .db
            .query_rows(
                "SELECT table_name FROM information_schema.tables
                 WHERE table_schema = 'main' AND table_type = 'BASE TABLE'",
            )
            .await?;
        for row in &tables {
            if let Some(name) = row.text("table_name") {
                catalog
                    .tables
                    .insert(name.to_string(), TableShape::default());
            }
        }

        let columns = self
            .db
            .query_rows(
                "SELECT table_name, column_name, data_type, is_nullable, column_default
                 FROM information_schema.columns
                 WHERE table_schema = 'main'
                 ORDER BY table_name, ordinal_position",
            )
            .await?;
        for row in &columns {
            let (Some(table), Some(column), Some(data_type)) = (
                row.text("table_name"),
                row.text("column_name"),
                row.text("data_type"),
            ) else {
                return Err(SchemaError::Metadata(
                    "malformed information_schema.columns row".to_string(),
                ));
            };
            // Views also report columns.
            let Some(shape) = catalog.tables.get_mut(table) else {
                continue;
            };
            shape.columns.insert(
                column.to_string(),
                ColumnShape {
                    data_type: data_type.to_string(),
                    nullable: row.text("is_nullable") != Some("NO"),
                    has_default: row.get("column_default").is_some_and(|v| !v.is_null()),
                },
            );
        }

        if self.db.relation_exists("al_meta.constraints").await? {
            for constraint in metadata::read_constraints(self.db).await? {
                catalog
                    .constraints
                    .insert(constraint.name.clone(), constraint);
            }
            catalog.enums = metadata::read_enums(self.db).await?;
        }

        Ok(catalog)
    }
}

#[cfg(test)]
#[path = "introspect_test.rs"]
mod tests;
