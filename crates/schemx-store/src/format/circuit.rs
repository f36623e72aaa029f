//! `core/circuit.xml`: net classes, net signals and component instances

use schemx_core::graph::{component_ops, net_ops};
use schemx_core::model::{ComponentInstance, NetClass, NetSignal};
use schemx_core::{CircuitGraph, ExError};

use super::{ATTR_NAME, ATTR_UUID};
use crate::errors::Result;
use crate::xml::XmlTree;

pub const ROOT: &str = "circuit";

pub fn write(graph: &CircuitGraph) -> Result<XmlTree> {
    let mut tree = XmlTree::new(ROOT)?;
    let root = tree.root();

    let classes = tree.create_child_node(root, "netclasses")?;
    for class in graph.net_classes() {
        let node = tree.create_child_node(classes, "netclass")?;
        tree.set_attribute(node, ATTR_UUID, class.id.to_string())?;
        tree.set_attribute(node, ATTR_NAME, class.name.as_str())?;
    }

    let signals = tree.create_child_node(root, "netsignals")?;
    for signal in graph.net_signals() {
        let node = tree.create_child_node(signals, "netsignal")?;
        tree.set_attribute(node, ATTR_UUID, signal.id.to_string())?;
        tree.set_attribute(node, ATTR_NAME, signal.name.as_str())?;
        tree.set_attribute(node, "netclass", signal.net_class_id.to_string())?;
        tree.set_attribute(node, "auto_name", signal.auto_name.to_string())?;
    }

    let instances = tree.create_child_node(root, "component_instances")?;
    for instance in graph.component_instances() {
        let node = tree.create_child_node(instances, "component_instance")?;
        tree.set_attribute(node, ATTR_UUID, instance.id.to_string())?;
        tree.set_attribute(node, ATTR_NAME, instance.name.as_str())?;
        tree.set_attribute(node, "lib_component", instance.library_component_id.to_string())?;
    }

    Ok(tree)
}

/// Add the circuit entities of `tree` to `graph`
///
/// The project library must already be loaded.
///
/// # Errors
///
/// Returns `Serialization` for missing or malformed attributes and the
/// validation kinds for entities that violate graph invariants.
pub fn read(tree: &XmlTree, graph: &mut CircuitGraph) -> Result<()> {
    let root = tree.root();

    if let Some(classes) = tree.child(root, "netclasses") {
        for node in tree.children_named(classes, "netclass") {
            let class = NetClass::new(
                tree.attribute_as(node, ATTR_UUID)?,
                tree.required_attribute(node, ATTR_NAME)?,
            );
            net_ops::add_net_class(graph, class, None).map_err(ExError::from)?;
        }
    }

    if let Some(signals) = tree.child(root, "netsignals") {
        for node in tree.children_named(signals, "netsignal") {
            let auto_name = match tree.attribute(node, "auto_name") {
                Some(_) => tree.attribute_as(node, "auto_name")?,
                None => false,
            };
            let signal = NetSignal::new(
                tree.attribute_as(node, ATTR_UUID)?,
                tree.required_attribute(node, ATTR_NAME)?,
                tree.attribute_as(node, "netclass")?,
            )
            .with_auto_name(auto_name);
            net_ops::add_net_signal(graph, signal, None).map_err(ExError::from)?;
        }
    }

    if let Some(instances) = tree.child(root, "component_instances") {
        for node in tree.children_named(instances, "component_instance") {
            let instance = ComponentInstance::new(
                tree.attribute_as(node, ATTR_UUID)?,
                tree.required_attribute(node, ATTR_NAME)?,
                tree.attribute_as(node, "lib_component")?,
            );
            component_ops::add_component_instance(graph, instance, None).map_err(ExError::from)?;
        }
    }

    Ok(())
}
