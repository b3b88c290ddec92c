//! al-store - The Autolot marketplace data layer
//!
//! Holds the marketplace migration registry, a row-level [`DataStore`] that
//! enforces the registered constraints, and the notification
//! [`RetentionJob`].

pub mod data_store;
pub mod entities;
pub mod error;
pub mod migrations;
pub mod retention;

pub use data_store::{record, DataStore, Record};
pub use entities::{
    tables, AdType, PackageCategory, PauseReason, ReferralJobType, ReferralStatus, UnknownEnumValue,
    UserRole, VehicleStatus,
};
pub use error::{RetentionError, RetentionResult, StoreError, StoreResult};
pub use migrations::marketplace_migrations;
pub use retention::RetentionJob;
