//! Schematic page and page item mutations
//!
//! Page items are addressed by `(schematic_id, item_id)`. Ids are unique
//! project-wide, but an item is only found on the page that owns it.

use schemx_core_types::{EntityId, Point};

use super::{insert_at, CircuitGraph};
use crate::errors::{ValidationError, ValidationResult};
use crate::model::{EntityKind, NetLine, NetPoint, Schematic, SymbolInstance};
use crate::registry::NameScope;

fn unknown(kind: EntityKind, id: EntityId) -> ValidationError {
    ValidationError::UnknownEntity { kind, id }
}

/// Add an empty schematic page
///
/// # Errors
/// * `DuplicateId`, `EmptyName`, `DuplicateName`
pub fn add_schematic(
    graph: &mut CircuitGraph,
    id: EntityId,
    name: &str,
    index: Option<usize>,
) -> ValidationResult<()> {
    graph.registry.claim(
        id,
        EntityKind::Schematic,
        Some((NameScope::Schematics, name)),
    )?;
    insert_at(&mut graph.schematics, id, Schematic::new(id, name), index);
    Ok(())
}

/// Remove an empty schematic page
///
/// Returns the former position and the page's name.
///
/// # Errors
/// * `UnknownEntity` - No such page
/// * `NonEmptyDependents` - The page still has symbols, net points or net lines
pub fn remove_schematic(graph: &mut CircuitGraph, id: EntityId) -> ValidationResult<(usize, String)> {
    let schematic = graph.schematic_or_err(id)?;
    let dependents = [
        (EntityKind::SymbolInstance, schematic.symbols.len()),
        (EntityKind::NetPoint, schematic.net_points.len()),
        (EntityKind::NetLine, schematic.net_lines.len()),
    ];
    if let Some((dependent_kind, count)) = dependents.into_iter().find(|(_, n)| *n > 0) {
        return Err(ValidationError::NonEmptyDependents {
            kind: EntityKind::Schematic,
            id,
            dependent_kind,
            count,
        });
    }

    let (index, _, schematic) = graph
        .schematics
        .shift_remove_full(&id)
        .ok_or_else(|| unknown(EntityKind::Schematic, id))?;
    graph
        .registry
        .release(id, Some((NameScope::Schematics, &schematic.name)));
    Ok((index, schematic.name))
}

/// Rename a schematic page, returning the previous name
pub fn rename_schematic(
    graph: &mut CircuitGraph,
    id: EntityId,
    name: &str,
) -> ValidationResult<String> {
    let schematic = graph
        .schematics
        .get_mut(&id)
        .ok_or_else(|| unknown(EntityKind::Schematic, id))?;
    graph
        .registry
        .rename(NameScope::Schematics, id, &schematic.name, name)?;
    Ok(std::mem::replace(&mut schematic.name, name.to_string()))
}

/// Place a symbol of an existing component instance on a page
///
/// # Errors
/// * `UnknownEntity` - No such page
/// * `DanglingReference` - The component instance does not exist
/// * `DuplicateId`
pub fn add_symbol_instance(
    graph: &mut CircuitGraph,
    schematic_id: EntityId,
    symbol: SymbolInstance,
    index: Option<usize>,
) -> ValidationResult<()> {
    graph.schematic_or_err(schematic_id)?;
    if !graph
        .component_instances
        .contains_key(&symbol.component_instance_id)
    {
        return Err(ValidationError::DanglingReference {
            kind: EntityKind::SymbolInstance,
            id: symbol.id,
            target_kind: EntityKind::ComponentInstance,
            target_id: symbol.component_instance_id,
        });
    }
    graph
        .registry
        .claim(symbol.id, EntityKind::SymbolInstance, None)?;

    let schematic = graph.schematic_mut_or_err(schematic_id)?;
    insert_at(&mut schematic.symbols, symbol.id, symbol, index);
    Ok(())
}

/// Remove a symbol that has no net points attached to its pins
///
/// # Errors
/// * `UnknownEntity` - No such page, or the symbol is not on it
/// * `NonEmptyDependents` - Net points are attached to the symbol
pub fn remove_symbol_instance(
    graph: &mut CircuitGraph,
    schematic_id: EntityId,
    id: EntityId,
) -> ValidationResult<(usize, SymbolInstance)> {
    let schematic = graph.schematic_or_err(schematic_id)?;
    if !schematic.symbols.contains_key(&id) {
        return Err(unknown(EntityKind::SymbolInstance, id));
    }
    let count = schematic
        .net_points
        .values()
        .filter(|p| p.pin.is_some_and(|pin| pin.symbol_id == id))
        .count();
    if count > 0 {
        return Err(ValidationError::NonEmptyDependents {
            kind: EntityKind::SymbolInstance,
            id,
            dependent_kind: EntityKind::NetPoint,
            count,
        });
    }

    let schematic = graph.schematic_mut_or_err(schematic_id)?;
    let (index, _, symbol) = schematic
        .symbols
        .shift_remove_full(&id)
        .ok_or_else(|| unknown(EntityKind::SymbolInstance, id))?;
    graph.registry.release(id, None);
    Ok((index, symbol))
}

/// Add a net point to a page
///
/// # Errors
/// * `UnknownEntity` - No such page
/// * `DanglingReference` - Unknown net signal, or the attached symbol is not
///   on the same page
/// * `DuplicateId`
pub fn add_net_point(
    graph: &mut CircuitGraph,
    schematic_id: EntityId,
    point: NetPoint,
    index: Option<usize>,
) -> ValidationResult<()> {
    let schematic = graph.schematic_or_err(schematic_id)?;
    if !graph.net_signals.contains_key(&point.net_signal_id) {
        return Err(ValidationError::DanglingReference {
            kind: EntityKind::NetPoint,
            id: point.id,
            target_kind: EntityKind::NetSignal,
            target_id: point.net_signal_id,
        });
    }
    if let Some(pin) = point.pin {
        if !schematic.symbols.contains_key(&pin.symbol_id) {
            return Err(ValidationError::DanglingReference {
                kind: EntityKind::NetPoint,
                id: point.id,
                target_kind: EntityKind::SymbolInstance,
                target_id: pin.symbol_id,
            });
        }
    }
    graph.registry.claim(point.id, EntityKind::NetPoint, None)?;

    let schematic = graph.schematic_mut_or_err(schematic_id)?;
    insert_at(&mut schematic.net_points, point.id, point, index);
    Ok(())
}

/// Remove a net point no net line references
///
/// # Errors
/// * `UnknownEntity` - No such page, or the point is not on it
/// * `NonEmptyDependents` - Net lines still end at the point
pub fn remove_net_point(
    graph: &mut CircuitGraph,
    schematic_id: EntityId,
    id: EntityId,
) -> ValidationResult<(usize, NetPoint)> {
    let schematic = graph.schematic_or_err(schematic_id)?;
    if !schematic.net_points.contains_key(&id) {
        return Err(unknown(EntityKind::NetPoint, id));
    }
    let count = schematic.lines_of_point(id).len();
    if count > 0 {
        return Err(ValidationError::NonEmptyDependents {
            kind: EntityKind::NetPoint,
            id,
            dependent_kind: EntityKind::NetLine,
            count,
        });
    }

    let schematic = graph.schematic_mut_or_err(schematic_id)?;
    let (index, _, point) = schematic
        .net_points
        .shift_remove_full(&id)
        .ok_or_else(|| unknown(EntityKind::NetPoint, id))?;
    graph.registry.release(id, None);
    Ok((index, point))
}

/// Move a net point, returning its previous position
pub fn move_net_point(
    graph: &mut CircuitGraph,
    schematic_id: EntityId,
    id: EntityId,
    position: Point,
) -> ValidationResult<Point> {
    let schematic = graph.schematic_mut_or_err(schematic_id)?;
    let point = schematic
        .net_points
        .get_mut(&id)
        .ok_or_else(|| unknown(EntityKind::NetPoint, id))?;
    Ok(std::mem::replace(&mut point.position, position))
}

/// Add a net line between two net points of the same page and net signal
///
/// # Errors
/// * `UnknownEntity` - No such page
/// * `DanglingReference` - An endpoint is not a net point of the page
/// * `NetSignalMismatch` - The endpoints belong to different net signals
/// * `DegenerateNetLine` - Start and end are the same net point
/// * `DuplicateId`
pub fn add_net_line(
    graph: &mut CircuitGraph,
    schematic_id: EntityId,
    line: NetLine,
    index: Option<usize>,
) -> ValidationResult<()> {
    let schematic = graph.schematic_or_err(schematic_id)?;
    if line.start_point_id == line.end_point_id {
        return Err(ValidationError::DegenerateNetLine {
            line_id: line.id,
            point_id: line.start_point_id,
        });
    }
    let endpoint = |point_id: EntityId| {
        schematic
            .net_points
            .get(&point_id)
            .ok_or(ValidationError::DanglingReference {
                kind: EntityKind::NetLine,
                id: line.id,
                target_kind: EntityKind::NetPoint,
                target_id: point_id,
            })
    };
    let start = endpoint(line.start_point_id)?;
    let end = endpoint(line.end_point_id)?;
    if start.net_signal_id != end.net_signal_id {
        return Err(ValidationError::NetSignalMismatch {
            line_id: line.id,
            start_signal: start.net_signal_id,
            end_signal: end.net_signal_id,
        });
    }
    graph.registry.claim(line.id, EntityKind::NetLine, None)?;

    let schematic = graph.schematic_mut_or_err(schematic_id)?;
    insert_at(&mut schematic.net_lines, line.id, line, index);
    Ok(())
}

/// Remove a net line
///
/// # Errors
/// * `UnknownEntity` - No such page, or the line is not on it
pub fn remove_net_line(
    graph: &mut CircuitGraph,
    schematic_id: EntityId,
    id: EntityId,
) -> ValidationResult<(usize, NetLine)> {
    let schematic = graph.schematic_mut_or_err(schematic_id)?;
    let (index, _, line) = schematic
        .net_lines
        .shift_remove_full(&id)
        .ok_or_else(|| unknown(EntityKind::NetLine, id))?;
    graph.registry.release(id, None);
    Ok((index, line))
}
