//! al-schema - Schema evolution for Autolot
//!
//! Provides the declarative schema model ([`SchemaOp`], [`Catalog`]), live
//! introspection of the store ([`SchemaIntrospect`]), the guarded executor
//! that applies one operation at a time, and the [`MigrationRunner`] that
//! moves a store between versions while recording history.

pub mod catalog;
pub mod error;
pub mod executor;
pub(crate) mod guard;
pub mod history;
pub mod introspect;
pub mod metadata;
pub mod migration;
pub mod op;
pub mod runner;
pub mod types;
pub mod version;

pub use catalog::{Catalog, ColumnShape, TableShape};
pub use error::{SchemaError, SchemaResult};
pub use executor::{apply_op, OpOutcome};
pub use history::AppliedMigration;
pub use introspect::{LiveSchema, SchemaIntrospect};
pub use migration::Migration;
pub use op::SchemaOp;
pub use runner::{ApplyReport, MigrationRunner, MigrationState, RevertReport, UnitReport};
pub use types::{ColumnDef, ColumnType, Constraint, ConstraintKind, DefaultValue, OnDelete};
pub use version::MigrationId;
