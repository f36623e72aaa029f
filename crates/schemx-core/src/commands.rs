//! Structural edit commands
//!
//! Every change to a `CircuitGraph` is expressed as a `Command`. Commands
//! carry all their inputs, including the collection position for additions,
//! so the inverse produced by `apply()` restores the exact prior state.

use schemx_core_types::{EntityId, Point};

use crate::events::{ChangeAction, ChangeEvent};
use crate::model::{
    ComponentInstance, EntityKind, LibraryComponent, NetClass, NetLine, NetPoint, NetSignal,
    SymbolInstance,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddLibraryComponent {
        component: LibraryComponent,
        index: Option<usize>,
    },
    RemoveLibraryComponent {
        id: EntityId,
    },

    AddNetClass {
        net_class: NetClass,
        index: Option<usize>,
    },
    RemoveNetClass {
        id: EntityId,
    },
    RenameNetClass {
        id: EntityId,
        name: String,
    },

    AddNetSignal {
        net_signal: NetSignal,
        index: Option<usize>,
    },
    RemoveNetSignal {
        id: EntityId,
    },
    /// Rename a net signal; `auto_name` is the flag the signal has afterwards
    RenameNetSignal {
        id: EntityId,
        name: String,
        auto_name: bool,
    },

    AddComponentInstance {
        instance: ComponentInstance,
        index: Option<usize>,
    },
    RemoveComponentInstance {
        id: EntityId,
    },
    RenameComponentInstance {
        id: EntityId,
        name: String,
    },

    /// Add an empty schematic page
    AddSchematic {
        id: EntityId,
        name: String,
        index: Option<usize>,
    },
    RemoveSchematic {
        id: EntityId,
    },
    RenameSchematic {
        id: EntityId,
        name: String,
    },

    AddSymbolInstance {
        schematic_id: EntityId,
        symbol: SymbolInstance,
        index: Option<usize>,
    },
    RemoveSymbolInstance {
        schematic_id: EntityId,
        id: EntityId,
    },

    AddNetPoint {
        schematic_id: EntityId,
        point: NetPoint,
        index: Option<usize>,
    },
    RemoveNetPoint {
        schematic_id: EntityId,
        id: EntityId,
    },
    MoveNetPoint {
        schematic_id: EntityId,
        id: EntityId,
        position: Point,
    },

    AddNetLine {
        schematic_id: EntityId,
        line: NetLine,
        index: Option<usize>,
    },
    RemoveNetLine {
        schematic_id: EntityId,
        id: EntityId,
    },
}

impl Command {
    pub fn add_library_component(component: LibraryComponent) -> Self {
        Command::AddLibraryComponent {
            component,
            index: None,
        }
    }

    pub fn add_net_class(net_class: NetClass) -> Self {
        Command::AddNetClass {
            net_class,
            index: None,
        }
    }

    pub fn add_net_signal(net_signal: NetSignal) -> Self {
        Command::AddNetSignal {
            net_signal,
            index: None,
        }
    }

    pub fn add_component_instance(instance: ComponentInstance) -> Self {
        Command::AddComponentInstance {
            instance,
            index: None,
        }
    }

    pub fn add_schematic(id: EntityId, name: impl Into<String>) -> Self {
        Command::AddSchematic {
            id,
            name: name.into(),
            index: None,
        }
    }

    pub fn add_symbol_instance(schematic_id: EntityId, symbol: SymbolInstance) -> Self {
        Command::AddSymbolInstance {
            schematic_id,
            symbol,
            index: None,
        }
    }

    pub fn add_net_point(schematic_id: EntityId, point: NetPoint) -> Self {
        Command::AddNetPoint {
            schematic_id,
            point,
            index: None,
        }
    }

    pub fn add_net_line(schematic_id: EntityId, line: NetLine) -> Self {
        Command::AddNetLine {
            schematic_id,
            line,
            index: None,
        }
    }

    /// The entity this command touches and how
    pub fn change(&self) -> ChangeEvent {
        use ChangeAction::*;
        let (action, kind, id, schematic_id) = match self {
            Command::AddLibraryComponent { component, .. } => {
                (Added, EntityKind::LibraryComponent, component.id, None)
            }
            Command::RemoveLibraryComponent { id } => {
                (Removed, EntityKind::LibraryComponent, *id, None)
            }
            Command::AddNetClass { net_class, .. } => {
                (Added, EntityKind::NetClass, net_class.id, None)
            }
            Command::RemoveNetClass { id } => (Removed, EntityKind::NetClass, *id, None),
            Command::RenameNetClass { id, .. } => (Modified, EntityKind::NetClass, *id, None),
            Command::AddNetSignal { net_signal, .. } => {
                (Added, EntityKind::NetSignal, net_signal.id, None)
            }
            Command::RemoveNetSignal { id } => (Removed, EntityKind::NetSignal, *id, None),
            Command::RenameNetSignal { id, .. } => (Modified, EntityKind::NetSignal, *id, None),
            Command::AddComponentInstance { instance, .. } => {
                (Added, EntityKind::ComponentInstance, instance.id, None)
            }
            Command::RemoveComponentInstance { id } => {
                (Removed, EntityKind::ComponentInstance, *id, None)
            }
            Command::RenameComponentInstance { id, .. } => {
                (Modified, EntityKind::ComponentInstance, *id, None)
            }
            Command::AddSchematic { id, .. } => (Added, EntityKind::Schematic, *id, None),
            Command::RemoveSchematic { id } => (Removed, EntityKind::Schematic, *id, None),
            Command::RenameSchematic { id, .. } => (Modified, EntityKind::Schematic, *id, None),
            Command::AddSymbolInstance {
                schematic_id,
                symbol,
                ..
            } => (
                Added,
                EntityKind::SymbolInstance,
                symbol.id,
                Some(*schematic_id),
            ),
            Command::RemoveSymbolInstance { schematic_id, id } => (
                Removed,
                EntityKind::SymbolInstance,
                *id,
                Some(*schematic_id),
            ),
            Command::AddNetPoint {
                schematic_id,
                point,
                ..
            } => (Added, EntityKind::NetPoint, point.id, Some(*schematic_id)),
            Command::RemoveNetPoint { schematic_id, id } => {
                (Removed, EntityKind::NetPoint, *id, Some(*schematic_id))
            }
            Command::MoveNetPoint {
                schematic_id, id, ..
            } => (Modified, EntityKind::NetPoint, *id, Some(*schematic_id)),
            Command::AddNetLine {
                schematic_id, line, ..
            } => (Added, EntityKind::NetLine, line.id, Some(*schematic_id)),
            Command::RemoveNetLine { schematic_id, id } => {
                (Removed, EntityKind::NetLine, *id, Some(*schematic_id))
            }
        };
        ChangeEvent {
            action,
            kind,
            id,
            schematic_id,
        }
    }

    /// Human-readable one-line description, used as default undo text
    pub fn description(&self) -> String {
        let change = self.change();
        let verb = match self {
            Command::RenameNetClass { .. }
            | Command::RenameNetSignal { .. }
            | Command::RenameComponentInstance { .. }
            | Command::RenameSchematic { .. } => "Rename",
            Command::MoveNetPoint { .. } => "Move",
            _ => match change.action {
                ChangeAction::Added => "Add",
                ChangeAction::Removed => "Remove",
                ChangeAction::Modified => "Modify",
            },
        };
        format!("{} {}", verb, change.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_of_page_item_carries_schematic() {
        let page = EntityId::new();
        let point = NetPoint::new(EntityId::new(), EntityId::new(), Point::default());
        let point_id = point.id;

        let change = Command::add_net_point(page, point).change();

        assert_eq!(change.action, ChangeAction::Added);
        assert_eq!(change.kind, EntityKind::NetPoint);
        assert_eq!(change.id, point_id);
        assert_eq!(change.schematic_id, Some(page));
    }

    #[test]
    fn test_descriptions() {
        let id = EntityId::new();
        assert_eq!(
            Command::add_net_class(NetClass::new(id, "default")).description(),
            "Add net class"
        );
        assert_eq!(
            Command::RenameSchematic {
                id,
                name: "Power".to_string()
            }
            .description(),
            "Rename schematic"
        );
        assert_eq!(Command::RemoveNetSignal { id }.description(), "Remove net signal");
    }
}
