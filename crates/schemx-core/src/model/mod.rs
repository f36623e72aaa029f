pub mod circuit;
pub mod library;
pub mod schematic;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use circuit::{ComponentInstance, NetClass, NetSignal};
pub use library::LibraryComponent;
pub use schematic::{
    NetLine, NetPoint, Schematic, SymbolInstance, SymbolPinRef, DEFAULT_LINE_WIDTH,
};

/// Kind tag of every entity that can live in a circuit graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    LibraryComponent,
    NetClass,
    NetSignal,
    ComponentInstance,
    Schematic,
    SymbolInstance,
    NetPoint,
    NetLine,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::LibraryComponent => "library component",
            EntityKind::NetClass => "net class",
            EntityKind::NetSignal => "net signal",
            EntityKind::ComponentInstance => "component instance",
            EntityKind::Schematic => "schematic",
            EntityKind::SymbolInstance => "symbol instance",
            EntityKind::NetPoint => "net point",
            EntityKind::NetLine => "net line",
        };
        f.write_str(s)
    }
}
