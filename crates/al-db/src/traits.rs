//! Database trait definition

use crate::error::DbResult;
use crate::value::{Row, Value};
use async_trait::async_trait;

/// Database abstraction trait for Autolot
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and collect every row
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Run a query and return the first column of the first row, if any
    async fn query_scalar(&self, sql: &str) -> DbResult<Option<Value>>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Open an explicit transaction on the shared connection
    async fn begin(&self) -> DbResult<()> {
        self.execute_batch("BEGIN TRANSACTION").await
    }

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()> {
        self.execute_batch("COMMIT").await
    }

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()> {
        self.execute_batch("ROLLBACK").await
    }
}
