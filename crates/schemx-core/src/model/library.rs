use schemx_core_types::EntityId;
use serde::{Deserialize, Serialize};

/// Component definition copied into the project library
///
/// Component instances of the circuit reference these entries by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryComponent {
    pub id: EntityId,

    /// Unique within the project library
    pub name: String,

    /// Designator prefix used when auto-naming instances ("R", "C", "U", ...)
    pub prefix: String,
}

impl LibraryComponent {
    pub fn new(id: EntityId, name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            prefix: prefix.into(),
        }
    }
}
