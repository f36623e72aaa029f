//! Project-wide circuit entities

use schemx_core_types::EntityId;
use serde::{Deserialize, Serialize};

/// Group of net signals sharing electrical rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetClass {
    pub id: EntityId,
    pub name: String,
}

impl NetClass {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An electrical net
///
/// Net points on any schematic page attach to a net signal; the signal in
/// turn belongs to exactly one net class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSignal {
    pub id: EntityId,
    pub name: String,
    pub net_class_id: EntityId,

    /// True while the name was generated (`N#<n>`) rather than chosen by the user
    pub auto_name: bool,
}

impl NetSignal {
    pub fn new(id: EntityId, name: impl Into<String>, net_class_id: EntityId) -> Self {
        Self {
            id,
            name: name.into(),
            net_class_id,
            auto_name: false,
        }
    }

    pub fn with_auto_name(mut self, auto_name: bool) -> Self {
        self.auto_name = auto_name;
        self
    }
}

/// Placement-independent instance of a library component ("R1", "U3")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub id: EntityId,
    pub name: String,
    pub library_component_id: EntityId,
}

impl ComponentInstance {
    pub fn new(id: EntityId, name: impl Into<String>, library_component_id: EntityId) -> Self {
        Self {
            id,
            name: name.into(),
            library_component_id,
        }
    }
}
