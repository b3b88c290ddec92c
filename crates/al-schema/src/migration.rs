//! Migration units.

use crate::error::SchemaResult;
use crate::op::SchemaOp;
use crate::version::MigrationId;

/// One versioned forward operation list with an optional inverse.
///
/// A unit without `down` cannot be reverted; enum value additions are the
/// usual case, since the store cannot remove a value once added.
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    id: MigrationId,
    name: String,
    up: Vec<SchemaOp>,
    down: Option<Vec<SchemaOp>>,
}

impl Migration {
    /// Build an irreversible unit from its file-style name.
    pub fn new(name: &str, up: Vec<SchemaOp>) -> SchemaResult<Self> {
        Ok(Self {
            id: MigrationId::parse(name)?,
            name: name.to_string(),
            up,
            down: None,
        })
    }

    /// Attach the inverse operations.
    pub fn with_down(mut self, down: Vec<SchemaOp>) -> Self {
        self.down = Some(down);
        self
    }

    pub fn id(&self) -> &MigrationId {
        &self.id
    }

    /// The name as registered, before token normalization.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn up(&self) -> &[SchemaOp] {
        &self.up
    }

    pub fn down(&self) -> Option<&[SchemaOp]> {
        self.down.as_deref()
    }

    pub fn is_reversible(&self) -> bool {
        self.down.is_some()
    }
}
