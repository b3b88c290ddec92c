//! al-db - Database abstraction layer for Autolot
//!
//! This crate provides the `Database` trait, the dynamically typed [`Value`]
//! and [`Row`] used to move data through it, and the DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod value;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
pub use value::{quote_ident, quote_literal, Row, Value};
