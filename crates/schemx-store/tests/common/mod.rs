use std::path::{Path, PathBuf};

use schemx_core::model::{ComponentInstance, LibraryComponent, NetClass, SymbolInstance};
use schemx_core::{Command, DrawWire, DEFAULT_NET_CLASS_NAME};
use schemx_core_types::{EntityId, Point};
use schemx_store::Project;

/// `<dir>/<name>/<name>.scx`
#[allow(dead_code)]
pub fn project_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name).join(format!("{}.scx", name))
}

/// Ids of the entities created by `populate`
#[allow(dead_code)]
pub struct Populated {
    pub power_class: EntityId,
    pub main_page: EntityId,
    pub second_page: EntityId,
    pub resistor: EntityId,
    pub r1: EntityId,
}

/// Fill a project with one entity of every kind on two pages
#[allow(dead_code)]
pub fn populate(project: &mut Project) -> Populated {
    let doc = project.document_mut();
    let power_class = EntityId::new();
    doc.execute(Command::add_net_class(NetClass::new(power_class, "power")))
        .expect("add class");

    let resistor = EntityId::new();
    doc.execute(Command::add_library_component(LibraryComponent::new(resistor, "Resistor", "R")))
        .expect("add library component");
    let r1 = EntityId::new();
    doc.execute(Command::add_component_instance(ComponentInstance::new(r1, "R1", resistor)))
        .expect("add instance");

    let main_page = EntityId::new();
    doc.execute(Command::add_schematic(main_page, "Main"))
        .expect("add page");
    let second_page = EntityId::new();
    doc.execute(Command::add_schematic(second_page, "Power"))
        .expect("add page");

    doc.execute(Command::add_symbol_instance(
        main_page,
        SymbolInstance::new(EntityId::new(), r1, Point::from_nm(5_080_000, 0)),
    ))
    .expect("place symbol");
    doc.draw_wire(&DrawWire::new(main_page, Point::from_nm(0, 0), Point::from_nm(2_540_000, 0)))
        .expect("draw wire");
    doc.draw_wire(
        &DrawWire::new(second_page, Point::from_nm(0, 0), Point::from_nm(0, 2_540_000))
            .in_net_class("power"),
    )
    .expect("draw wire");

    assert!(doc.graph().net_class_by_name(DEFAULT_NET_CLASS_NAME).is_some());
    Populated {
        power_class,
        main_page,
        second_page,
        resistor,
        r1,
    }
}
