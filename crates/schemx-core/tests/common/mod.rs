use schemx_core::model::{LibraryComponent, NetClass, NetPoint, NetSignal};
use schemx_core::{Command, Document, CircuitGraph, DEFAULT_NET_CLASS_NAME};
use schemx_core_types::{EntityId, Point};

/// Document over a graph holding only the default net class
#[allow(dead_code)]
pub fn new_document() -> Document {
    Document::new(CircuitGraph::with_default_net_class())
}

#[allow(dead_code)]
pub fn default_class_id(doc: &Document) -> EntityId {
    doc.graph()
        .net_class_by_name(DEFAULT_NET_CLASS_NAME)
        .expect("default net class")
        .id
}

#[allow(dead_code)]
pub fn add_net_class(doc: &mut Document, name: &str) -> EntityId {
    let id = EntityId::new();
    doc.execute(Command::add_net_class(NetClass::new(id, name)))
        .expect("add net class");
    id
}

#[allow(dead_code)]
pub fn add_net_signal(doc: &mut Document, name: &str, class_id: EntityId) -> EntityId {
    let id = EntityId::new();
    doc.execute(Command::add_net_signal(NetSignal::new(id, name, class_id)))
        .expect("add net signal");
    id
}

#[allow(dead_code)]
pub fn add_library_component(doc: &mut Document, name: &str, prefix: &str) -> EntityId {
    let id = EntityId::new();
    doc.execute(Command::add_library_component(LibraryComponent::new(id, name, prefix)))
        .expect("add library component");
    id
}

#[allow(dead_code)]
pub fn add_schematic(doc: &mut Document, name: &str) -> EntityId {
    let id = EntityId::new();
    doc.execute(Command::add_schematic(id, name))
        .expect("add schematic");
    id
}

#[allow(dead_code)]
pub fn add_net_point(doc: &mut Document, page: EntityId, signal: EntityId, x: i64, y: i64) -> EntityId {
    let id = EntityId::new();
    doc.execute(Command::add_net_point(
        page,
        NetPoint::new(id, signal, Point::from_nm(x, y)),
    ))
    .expect("add net point");
    id
}
