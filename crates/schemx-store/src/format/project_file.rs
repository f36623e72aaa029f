//! Project file: metadata, project library and page order

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use schemx_core::graph::library_ops;
use schemx_core::model::LibraryComponent;
use schemx_core::{CircuitGraph, ExError, ExErrorKind};
use schemx_core_types::EntityId;

use super::{schematic_file, ATTR_NAME, ATTR_UUID};
use crate::errors::{serialization_error, Result};
use crate::xml::XmlTree;

pub const ROOT: &str = "project";

/// Version written to and accepted from project files
pub const FORMAT_VERSION: u32 = 1;

/// Project identity stored in the `meta` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMeta {
    pub id: EntityId,
    pub name: String,
    pub created: DateTime<Utc>,
}

impl ProjectMeta {
    /// New metadata stamped with the current time, truncated to seconds
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            created: Utc::now().trunc_subsecs(0),
        }
    }
}

/// A page listed in the project file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchematicEntry {
    pub id: EntityId,
    /// Page file relative to the project directory
    pub file: String,
}

pub fn write(meta: &ProjectMeta, graph: &CircuitGraph) -> Result<XmlTree> {
    let mut tree = XmlTree::new(ROOT)?;
    let root = tree.root();
    tree.set_attribute(root, "version", FORMAT_VERSION.to_string())?;

    let meta_node = tree.create_child_node(root, "meta")?;
    tree.set_attribute(meta_node, ATTR_UUID, meta.id.to_string())?;
    tree.set_attribute(meta_node, ATTR_NAME, meta.name.as_str())?;
    tree.set_attribute(
        meta_node,
        "created",
        meta.created.to_rfc3339_opts(SecondsFormat::Secs, true),
    )?;

    let library = tree.create_child_node(root, "library")?;
    for component in graph.library_components() {
        let node = tree.create_child_node(library, "component")?;
        tree.set_attribute(node, ATTR_UUID, component.id.to_string())?;
        tree.set_attribute(node, ATTR_NAME, component.name.as_str())?;
        tree.set_attribute(node, "prefix", component.prefix.as_str())?;
    }

    let schematics = tree.create_child_node(root, "schematics")?;
    for schematic in graph.schematics() {
        let node = tree.create_child_node(schematics, "schematic")?;
        tree.set_attribute(node, ATTR_UUID, schematic.id.to_string())?;
        tree.set_attribute(node, "file", schematic_file(schematic.id))?;
    }

    Ok(tree)
}

/// Read metadata and page list, adding library components to `graph`
///
/// # Errors
///
/// Returns `Serialization` for missing or malformed attributes or an
/// unsupported version, and the validation kinds for library entries that
/// violate graph invariants.
pub fn read(tree: &XmlTree, graph: &mut CircuitGraph) -> Result<(ProjectMeta, Vec<SchematicEntry>)> {
    let root = tree.root();
    let version: u32 = tree.attribute_as(root, "version")?;
    if version != FORMAT_VERSION {
        return Err(serialization_error(
            "project_read",
            format!("unsupported project format version {}", version),
        ));
    }

    let meta_node = tree
        .child(root, "meta")
        .ok_or_else(|| serialization_error("project_read", "missing <meta>"))?;
    let meta = ProjectMeta {
        id: tree.attribute_as(meta_node, ATTR_UUID)?,
        name: tree.required_attribute(meta_node, ATTR_NAME)?.to_string(),
        created: tree.attribute_as(meta_node, "created")?,
    };

    if let Some(library) = tree.child(root, "library") {
        for node in tree.children_named(library, "component") {
            let component = LibraryComponent::new(
                tree.attribute_as(node, ATTR_UUID)?,
                tree.required_attribute(node, ATTR_NAME)?,
                tree.attribute(node, "prefix").unwrap_or_default(),
            );
            library_ops::add_library_component(graph, component, None).map_err(ExError::from)?;
        }
    }

    let mut entries = Vec::new();
    if let Some(schematics) = tree.child(root, "schematics") {
        for node in tree.children_named(schematics, "schematic") {
            let file = tree.required_attribute(node, "file")?;
            if file.contains("..") || file.starts_with('/') {
                return Err(ExError::new(ExErrorKind::Serialization)
                    .with_op("project_read")
                    .with_message(format!("page file \"{}\" leaves the project directory", file)));
            }
            entries.push(SchematicEntry {
                id: tree.attribute_as(node, ATTR_UUID)?,
                file: file.to_string(),
            });
        }
    }

    Ok((meta, entries))
}
