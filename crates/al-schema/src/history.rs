//! Persisted migration history in `al_meta.schema_migrations`.

use crate::error::{SchemaError, SchemaResult};
use crate::version::MigrationId;
use al_db::{quote_literal as lit, Database};
use chrono::NaiveDateTime;
use serde::Serialize;

/// One recorded unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: String,
    pub description: String,
    pub applied_at: NaiveDateTime,
}

/// Recorded units in ascending id order.
///
/// Versions are stored in canonical `<token>-<description>` form, whose
/// text order is the id order.
pub async fn read_applied(db: &dyn Database) -> SchemaResult<Vec<AppliedMigration>> {
    let rows = db
        .query_rows(
            "SELECT version, description, applied_at
             FROM al_meta.schema_migrations ORDER BY version",
        )
        .await?;

    let mut applied = Vec::with_capacity(rows.len());
    for row in &rows {
        let (Some(version), Some(description), Some(applied_at)) = (
            row.text("version"),
            row.text("description"),
            row.get("applied_at").and_then(|v| v.as_timestamp()),
        ) else {
            return Err(SchemaError::Metadata(
                "malformed schema_migrations row".to_string(),
            ));
        };
        applied.push(AppliedMigration {
            version: version.to_string(),
            description: description.to_string(),
            applied_at,
        });
    }
    Ok(applied)
}

pub(crate) fn record_sql(id: &MigrationId) -> String {
    format!(
        "INSERT INTO al_meta.schema_migrations (version, description) VALUES ({}, {})",
        lit(&id.to_string()),
        lit(id.description())
    )
}

pub(crate) fn remove_sql(version: &str) -> String {
    format!(
        "DELETE FROM al_meta.schema_migrations WHERE version = {}",
        lit(version)
    )
}
