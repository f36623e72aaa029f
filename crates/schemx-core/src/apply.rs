//! Command dispatch
//!
//! `apply()` executes one command against a graph and returns the command
//! that exactly reverses it. Undo is `apply(inverse)`, which in turn yields
//! the original command again, so redo needs no extra bookkeeping.
//!
//! ## Atomicity contract
//!
//! - **All-or-nothing**: on `Err` the graph is unchanged
//! - **Position-preserving**: the inverse of a removal re-inserts at the
//!   former index, the inverse of an addition removes by id
//!
//! ```
//! use schemx_core::{apply, CircuitGraph, Command};
//! use schemx_core::model::NetClass;
//! use schemx_core_types::EntityId;
//!
//! let mut graph = CircuitGraph::new();
//! let cmd = Command::add_net_class(NetClass::new(EntityId::new(), "power"));
//! let inverse = apply(&mut graph, &cmd).unwrap();
//! assert_eq!(graph.net_classes().count(), 1);
//!
//! apply(&mut graph, &inverse).unwrap();
//! assert!(graph.is_empty());
//! ```

use crate::commands::Command;
use crate::errors::ValidationResult;
use crate::graph::{component_ops, library_ops, net_ops, schematic_ops, CircuitGraph};

/// Execute `cmd` on `graph`, returning its inverse
///
/// # Errors
///
/// Returns the `ValidationError` of the underlying graph operation. The
/// graph is left untouched in that case.
pub fn apply(graph: &mut CircuitGraph, cmd: &Command) -> ValidationResult<Command> {
    let inverse = match cmd {
        Command::AddLibraryComponent { component, index } => {
            library_ops::add_library_component(graph, component.clone(), *index)?;
            Command::RemoveLibraryComponent { id: component.id }
        }
        Command::RemoveLibraryComponent { id } => {
            let (index, component) = library_ops::remove_library_component(graph, *id)?;
            Command::AddLibraryComponent {
                component,
                index: Some(index),
            }
        }

        Command::AddNetClass { net_class, index } => {
            net_ops::add_net_class(graph, net_class.clone(), *index)?;
            Command::RemoveNetClass { id: net_class.id }
        }
        Command::RemoveNetClass { id } => {
            let (index, net_class) = net_ops::remove_net_class(graph, *id)?;
            Command::AddNetClass {
                net_class,
                index: Some(index),
            }
        }
        Command::RenameNetClass { id, name } => {
            let old = net_ops::rename_net_class(graph, *id, name)?;
            Command::RenameNetClass { id: *id, name: old }
        }

        Command::AddNetSignal { net_signal, index } => {
            net_ops::add_net_signal(graph, net_signal.clone(), *index)?;
            Command::RemoveNetSignal { id: net_signal.id }
        }
        Command::RemoveNetSignal { id } => {
            let (index, net_signal) = net_ops::remove_net_signal(graph, *id)?;
            Command::AddNetSignal {
                net_signal,
                index: Some(index),
            }
        }
        Command::RenameNetSignal {
            id,
            name,
            auto_name,
        } => {
            let (old_name, old_auto) = net_ops::rename_net_signal(graph, *id, name, *auto_name)?;
            Command::RenameNetSignal {
                id: *id,
                name: old_name,
                auto_name: old_auto,
            }
        }

        Command::AddComponentInstance { instance, index } => {
            component_ops::add_component_instance(graph, instance.clone(), *index)?;
            Command::RemoveComponentInstance { id: instance.id }
        }
        Command::RemoveComponentInstance { id } => {
            let (index, instance) = component_ops::remove_component_instance(graph, *id)?;
            Command::AddComponentInstance {
                instance,
                index: Some(index),
            }
        }
        Command::RenameComponentInstance { id, name } => {
            let old = component_ops::rename_component_instance(graph, *id, name)?;
            Command::RenameComponentInstance { id: *id, name: old }
        }

        Command::AddSchematic { id, name, index } => {
            schematic_ops::add_schematic(graph, *id, name, *index)?;
            Command::RemoveSchematic { id: *id }
        }
        Command::RemoveSchematic { id } => {
            let (index, name) = schematic_ops::remove_schematic(graph, *id)?;
            Command::AddSchematic {
                id: *id,
                name,
                index: Some(index),
            }
        }
        Command::RenameSchematic { id, name } => {
            let old = schematic_ops::rename_schematic(graph, *id, name)?;
            Command::RenameSchematic { id: *id, name: old }
        }

        Command::AddSymbolInstance {
            schematic_id,
            symbol,
            index,
        } => {
            schematic_ops::add_symbol_instance(graph, *schematic_id, symbol.clone(), *index)?;
            Command::RemoveSymbolInstance {
                schematic_id: *schematic_id,
                id: symbol.id,
            }
        }
        Command::RemoveSymbolInstance { schematic_id, id } => {
            let (index, symbol) = schematic_ops::remove_symbol_instance(graph, *schematic_id, *id)?;
            Command::AddSymbolInstance {
                schematic_id: *schematic_id,
                symbol,
                index: Some(index),
            }
        }

        Command::AddNetPoint {
            schematic_id,
            point,
            index,
        } => {
            schematic_ops::add_net_point(graph, *schematic_id, point.clone(), *index)?;
            Command::RemoveNetPoint {
                schematic_id: *schematic_id,
                id: point.id,
            }
        }
        Command::RemoveNetPoint { schematic_id, id } => {
            let (index, point) = schematic_ops::remove_net_point(graph, *schematic_id, *id)?;
            Command::AddNetPoint {
                schematic_id: *schematic_id,
                point,
                index: Some(index),
            }
        }
        Command::MoveNetPoint {
            schematic_id,
            id,
            position,
        } => {
            let old = schematic_ops::move_net_point(graph, *schematic_id, *id, *position)?;
            Command::MoveNetPoint {
                schematic_id: *schematic_id,
                id: *id,
                position: old,
            }
        }

        Command::AddNetLine {
            schematic_id,
            line,
            index,
        } => {
            schematic_ops::add_net_line(graph, *schematic_id, line.clone(), *index)?;
            Command::RemoveNetLine {
                schematic_id: *schematic_id,
                id: line.id,
            }
        }
        Command::RemoveNetLine { schematic_id, id } => {
            let (index, line) = schematic_ops::remove_net_line(graph, *schematic_id, *id)?;
            Command::AddNetLine {
                schematic_id: *schematic_id,
                line,
                index: Some(index),
            }
        }
    };

    tracing::debug!(command = %cmd.description(), entity_id = %cmd.change().id, "applied");
    Ok(inverse)
}
