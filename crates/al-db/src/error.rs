//! Error types for al-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Row rejected by a NOT NULL, CHECK, PRIMARY KEY or UNIQUE constraint (D004)
    #[error("[D004] Constraint violated: {0}")]
    ConstraintViolation(String),

    /// Transaction control failed (D005)
    #[error("[D005] Transaction failed: {0}")]
    TransactionError(String),

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Internal error (D007)
    #[error("[D007] Internal database error: {0}")]
    Internal(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Classify a DuckDB error raised while running `sql`.
    ///
    /// duckdb::Error does not expose structured variants, so the message
    /// prefix is the only reliable signal. Patterns are kept narrow so that
    /// catalog and parser errors stay `ExecutionError`.
    pub fn from_duckdb(err: &duckdb::Error, sql: &str) -> Self {
        let msg = err.to_string();
        if msg.contains("Constraint Error") {
            DbError::ConstraintViolation(msg)
        } else if msg.contains("Table with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(format!("{msg}: {sql}"))
        }
    }

    /// Whether the store rejected a row for violating a declared constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation(_))
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::from_duckdb(&err, "")
    }
}
