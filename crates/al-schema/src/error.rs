//! Error types for al-schema

use al_db::DbError;
use thiserror::Error;

/// Schema evolution errors.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The store rejected a schema operation (S001).
    #[error("[S001] Schema operation '{op}' rejected: {message}")]
    SchemaOperation { op: String, message: String },

    /// A migration unit failed; the batch halted (S002).
    #[error("[S002] Migration {migration} failed: {source}")]
    UnitFailed {
        migration: String,
        #[source]
        source: Box<SchemaError>,
    },

    /// A migration name does not carry a usable version token (S003).
    #[error("[S003] Invalid migration name '{name}': {reason}")]
    InvalidVersion { name: String, reason: String },

    /// Two registered units share the same id (S004).
    #[error("[S004] Duplicate migration id: {0}")]
    DuplicateMigration(String),

    /// A history row or target names a unit the registry does not know (S005).
    #[error("[S005] Migration {0} is not in the registry")]
    UnknownMigration(String),

    /// Foreign keys form a cycle between tables (S006).
    #[error("[S006] Circular foreign key dependency: {0}")]
    CircularDependency(String),

    /// Reading or writing migration metadata failed (S007).
    #[error("[S007] Schema metadata error: {0}")]
    Metadata(String),

    /// Underlying database error (S008).
    #[error("[S008] {0}")]
    Db(#[from] DbError),
}

/// Result type alias for [`SchemaError`].
pub type SchemaResult<T> = Result<T, SchemaError>;

impl SchemaError {
    pub(crate) fn rejected(op: impl ToString, message: impl Into<String>) -> Self {
        SchemaError::SchemaOperation {
            op: op.to_string(),
            message: message.into(),
        }
    }

    /// The store-level rejection behind this error, unwrapping unit context.
    pub fn schema_operation(&self) -> Option<(&str, &str)> {
        match self {
            SchemaError::SchemaOperation { op, message } => Some((op, message)),
            SchemaError::UnitFailed { source, .. } => source.schema_operation(),
            _ => None,
        }
    }
}
