//! CLI command implementations

pub(crate) mod migrate;
pub(crate) mod retention;
pub(crate) mod schema;
