//! `schematics/<id>.xml`: one schematic page with its items

use schemx_core::graph::schematic_ops;
use schemx_core::model::{NetLine, NetPoint, Schematic, SymbolInstance, SymbolPinRef};
use schemx_core::{CircuitGraph, ExError};
use schemx_core_types::{Angle, EntityId, Point};

use super::{ATTR_NAME, ATTR_UUID};
use crate::errors::Result;
use crate::xml::{NodeId, XmlTree};

pub const ROOT: &str = "schematic";

fn set_position(tree: &mut XmlTree, node: NodeId, position: Point) -> Result<()> {
    tree.set_attribute(node, "x", position.x.to_string())?;
    tree.set_attribute(node, "y", position.y.to_string())
}

fn position(tree: &XmlTree, node: NodeId) -> Result<Point> {
    Ok(Point::new(tree.attribute_as(node, "x")?, tree.attribute_as(node, "y")?))
}

pub fn write(schematic: &Schematic) -> Result<XmlTree> {
    let mut tree = XmlTree::new(ROOT)?;
    let root = tree.root();
    tree.set_attribute(root, ATTR_UUID, schematic.id.to_string())?;
    tree.set_attribute(root, ATTR_NAME, schematic.name.as_str())?;

    let symbols = tree.create_child_node(root, "symbols")?;
    for symbol in schematic.symbols() {
        let node = tree.create_child_node(symbols, "symbol")?;
        tree.set_attribute(node, ATTR_UUID, symbol.id.to_string())?;
        tree.set_attribute(node, "component", symbol.component_instance_id.to_string())?;
        set_position(&mut tree, node, symbol.position)?;
        tree.set_attribute(node, "rotation", symbol.rotation.to_string())?;
    }

    let points = tree.create_child_node(root, "netpoints")?;
    for point in schematic.net_points() {
        let node = tree.create_child_node(points, "netpoint")?;
        tree.set_attribute(node, ATTR_UUID, point.id.to_string())?;
        tree.set_attribute(node, "netsignal", point.net_signal_id.to_string())?;
        set_position(&mut tree, node, point.position)?;
        if let Some(pin) = point.pin {
            tree.set_attribute(node, "symbol", pin.symbol_id.to_string())?;
            tree.set_attribute(node, "pin", pin.pin_id.to_string())?;
        }
    }

    let lines = tree.create_child_node(root, "netlines")?;
    for line in schematic.net_lines() {
        let node = tree.create_child_node(lines, "netline")?;
        tree.set_attribute(node, ATTR_UUID, line.id.to_string())?;
        tree.set_attribute(node, "start", line.start_point_id.to_string())?;
        tree.set_attribute(node, "end", line.end_point_id.to_string())?;
        tree.set_attribute(node, "width", line.width.to_string())?;
    }

    Ok(tree)
}

/// Add the page of `tree` with all its items to `graph`
///
/// Returns the page id. Net signals and component instances must already
/// be loaded.
///
/// # Errors
///
/// Returns `Serialization` for missing or malformed attributes and the
/// validation kinds for items that violate graph invariants.
pub fn read(tree: &XmlTree, graph: &mut CircuitGraph) -> Result<EntityId> {
    let root = tree.root();
    let id: EntityId = tree.attribute_as(root, ATTR_UUID)?;
    schematic_ops::add_schematic(graph, id, tree.required_attribute(root, ATTR_NAME)?, None)
        .map_err(ExError::from)?;

    if let Some(symbols) = tree.child(root, "symbols") {
        for node in tree.children_named(symbols, "symbol") {
            let rotation: Angle = match tree.attribute(node, "rotation") {
                Some(_) => tree.attribute_as(node, "rotation")?,
                None => Angle::default(),
            };
            let symbol = SymbolInstance::new(
                tree.attribute_as(node, ATTR_UUID)?,
                tree.attribute_as(node, "component")?,
                position(tree, node)?,
            )
            .with_rotation(rotation);
            schematic_ops::add_symbol_instance(graph, id, symbol, None).map_err(ExError::from)?;
        }
    }

    if let Some(points) = tree.child(root, "netpoints") {
        for node in tree.children_named(points, "netpoint") {
            let mut point = NetPoint::new(
                tree.attribute_as(node, ATTR_UUID)?,
                tree.attribute_as(node, "netsignal")?,
                position(tree, node)?,
            );
            if tree.attribute(node, "symbol").is_some() {
                point = point.attached_to(SymbolPinRef {
                    symbol_id: tree.attribute_as(node, "symbol")?,
                    pin_id: tree.attribute_as(node, "pin")?,
                });
            }
            schematic_ops::add_net_point(graph, id, point, None).map_err(ExError::from)?;
        }
    }

    if let Some(lines) = tree.child(root, "netlines") {
        for node in tree.children_named(lines, "netline") {
            let mut line = NetLine::new(
                tree.attribute_as(node, ATTR_UUID)?,
                tree.attribute_as(node, "start")?,
                tree.attribute_as(node, "end")?,
            );
            if tree.attribute(node, "width").is_some() {
                line = line.with_width(tree.attribute_as(node, "width")?);
            }
            schematic_ops::add_net_line(graph, id, line, None).map_err(ExError::from)?;
        }
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemx_core::graph::net_ops;
    use schemx_core::model::{NetClass, NetSignal};
    use schemx_core::ExErrorKind;

    fn graph_with_signal() -> (CircuitGraph, EntityId) {
        let mut graph = CircuitGraph::new();
        let class = EntityId::new();
        net_ops::add_net_class(&mut graph, NetClass::new(class, "default"), None).unwrap();
        let signal = EntityId::new();
        net_ops::add_net_signal(&mut graph, NetSignal::new(signal, "GND", class), None).unwrap();
        (graph, signal)
    }

    #[test]
    fn test_page_round_trip_keeps_item_order() {
        let (mut graph, signal) = graph_with_signal();
        let page = EntityId::new();
        schematic_ops::add_schematic(&mut graph, page, "Main", None).unwrap();
        let before = graph.clone();
        let (a, b) = (EntityId::new(), EntityId::new());
        let origin = NetPoint::new(b, signal, Point::from_nm(0, 0));
        let offset = NetPoint::new(a, signal, Point::from_nm(2_540_000, -1_270_000));
        schematic_ops::add_net_point(&mut graph, page, origin, None).unwrap();
        schematic_ops::add_net_point(&mut graph, page, offset, None).unwrap();
        let line = NetLine::new(EntityId::new(), b, a);
        schematic_ops::add_net_line(&mut graph, page, line.clone(), None).unwrap();
        let tree = write(graph.schematic(page).unwrap()).unwrap();

        let mut loaded = before;
        schematic_ops::remove_schematic(&mut loaded, page).unwrap();
        assert_eq!(read(&tree, &mut loaded).unwrap(), page);

        let order: Vec<EntityId> = loaded.schematic(page).unwrap().net_points().map(|p| p.id).collect();
        assert_eq!(order, vec![b, a]);
        assert_eq!(loaded.schematic(page).unwrap().net_line(line.id), Some(&line));
        assert_eq!(loaded, graph);
    }

    #[test]
    fn test_line_to_missing_point_is_rejected() {
        let (mut graph, _) = graph_with_signal();
        let xml = format!(
            r#"<schematic uuid="{}" name="Main"><netlines>
                 <netline uuid="{}" start="{}" end="{}"/>
               </netlines></schematic>"#,
            EntityId::new(),
            EntityId::new(),
            EntityId::new(),
            EntityId::new()
        );
        let tree = XmlTree::parse(xml.as_bytes()).unwrap();
        let err = read(&tree, &mut graph).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DanglingReference);
    }
}
