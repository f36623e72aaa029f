//! Entity ↔ XML node mapping
//!
//! A project is stored as three kinds of files below the project directory:
//! the project file (`<name>.scx`, metadata, library and page order),
//! `core/circuit.xml` (net classes, net signals, component instances) and
//! one `schematics/<id>.xml` per page. Readers feed every entity through the
//! graph operations, so a loaded graph satisfies the same invariants as an
//! edited one.

pub mod circuit;
pub mod project_file;
pub mod schematic;

use schemx_core_types::EntityId;

pub use project_file::{ProjectMeta, SchematicEntry, FORMAT_VERSION};

/// Extension of project files
pub const PROJECT_FILE_EXTENSION: &str = "scx";

/// Circuit file, relative to the project directory
pub const CIRCUIT_FILE: &str = "core/circuit.xml";

/// Directory of page files, relative to the project directory
pub const SCHEMATICS_DIR: &str = "schematics";

/// Page file of schematic `id`, relative to the project directory
pub fn schematic_file(id: EntityId) -> String {
    format!("{}/{}.xml", SCHEMATICS_DIR, id)
}

pub(crate) const ATTR_UUID: &str = "uuid";
pub(crate) const ATTR_NAME: &str = "name";
