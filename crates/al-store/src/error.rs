//! Error types for al-store

use al_db::DbError;
use al_schema::SchemaError;
use thiserror::Error;

/// Row-level data store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write would break a NOT NULL, UNIQUE, CHECK, FOREIGN KEY, RESTRICT or
    /// enum constraint (T001). Not retried.
    #[error("[T001] Integrity violation on {table}: {message}")]
    IntegrityViolation { table: String, message: String },

    /// No row with the given id (T002)
    #[error("[T002] No row {id} in {table}")]
    NotFound { table: String, id: String },

    /// Table is not part of the installed schema (T003)
    #[error("[T003] Unknown table: {0}")]
    UnknownTable(String),

    /// Column is not part of the table (T004)
    #[error("[T004] Unknown column {table}.{column}")]
    UnknownColumn { table: String, column: String },

    /// Reading the installed schema failed (T005)
    #[error("[T005] {0}")]
    Schema(#[from] SchemaError),

    /// Underlying database error (T006)
    #[error("[T006] {0}")]
    Db(#[from] DbError),
}

impl StoreError {
    /// Classify a failed write on `table`: store-side constraint failures
    /// (NOT NULL, CHECK) become integrity violations.
    pub(crate) fn from_write(table: &str, err: DbError) -> Self {
        match err {
            DbError::ConstraintViolation(message) => StoreError::IntegrityViolation {
                table: table.to_string(),
                message,
            },
            other => StoreError::Db(other),
        }
    }

    pub(crate) fn integrity(table: &str, message: impl Into<String>) -> Self {
        StoreError::IntegrityViolation {
            table: table.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

/// Retention job errors.
#[derive(Error, Debug)]
pub enum RetentionError {
    /// One tick failed; the next tick is the retry (R001)
    #[error("[R001] Retention tick on {table} failed: {source}")]
    Tick {
        table: String,
        #[source]
        source: DbError,
    },

    /// Retention settings are unusable (R002)
    #[error("[R002] Invalid retention settings: {0}")]
    Config(#[from] al_core::CoreError),
}

/// Result type alias for [`RetentionError`].
pub type RetentionResult<T> = Result<T, RetentionError>;
