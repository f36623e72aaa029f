//! Net class and net signal mutations

use schemx_core_types::EntityId;

use super::{insert_at, CircuitGraph};
use crate::errors::{ValidationError, ValidationResult};
use crate::model::{EntityKind, NetClass, NetSignal};
use crate::registry::NameScope;

fn unknown(kind: EntityKind, id: EntityId) -> ValidationError {
    ValidationError::UnknownEntity { kind, id }
}

/// Add a net class
///
/// # Errors
/// * `DuplicateId`, `EmptyName`, `DuplicateName`
pub fn add_net_class(
    graph: &mut CircuitGraph,
    net_class: NetClass,
    index: Option<usize>,
) -> ValidationResult<()> {
    graph.registry.claim(
        net_class.id,
        EntityKind::NetClass,
        Some((NameScope::NetClasses, &net_class.name)),
    )?;
    insert_at(&mut graph.net_classes, net_class.id, net_class, index);
    Ok(())
}

/// Remove a net class that owns no net signals
///
/// # Errors
/// * `UnknownEntity` - No such net class
/// * `NonEmptyDependents` - Net signals still belong to the class
pub fn remove_net_class(
    graph: &mut CircuitGraph,
    id: EntityId,
) -> ValidationResult<(usize, NetClass)> {
    if !graph.net_classes.contains_key(&id) {
        return Err(unknown(EntityKind::NetClass, id));
    }
    let count = graph.signals_of_class(id).count();
    if count > 0 {
        return Err(ValidationError::NonEmptyDependents {
            kind: EntityKind::NetClass,
            id,
            dependent_kind: EntityKind::NetSignal,
            count,
        });
    }

    let (index, _, net_class) = graph
        .net_classes
        .shift_remove_full(&id)
        .ok_or_else(|| unknown(EntityKind::NetClass, id))?;
    graph
        .registry
        .release(id, Some((NameScope::NetClasses, &net_class.name)));
    Ok((index, net_class))
}

/// Rename a net class, returning the previous name
pub fn rename_net_class(
    graph: &mut CircuitGraph,
    id: EntityId,
    name: &str,
) -> ValidationResult<String> {
    let net_class = graph
        .net_classes
        .get_mut(&id)
        .ok_or_else(|| unknown(EntityKind::NetClass, id))?;
    graph
        .registry
        .rename(NameScope::NetClasses, id, &net_class.name, name)?;
    Ok(std::mem::replace(&mut net_class.name, name.to_string()))
}

/// Add a net signal to an existing net class
///
/// # Errors
/// * `DanglingReference` - The net class does not exist
/// * `DuplicateId`, `EmptyName`, `DuplicateName`
pub fn add_net_signal(
    graph: &mut CircuitGraph,
    net_signal: NetSignal,
    index: Option<usize>,
) -> ValidationResult<()> {
    if !graph.net_classes.contains_key(&net_signal.net_class_id) {
        return Err(ValidationError::DanglingReference {
            kind: EntityKind::NetSignal,
            id: net_signal.id,
            target_kind: EntityKind::NetClass,
            target_id: net_signal.net_class_id,
        });
    }
    graph.registry.claim(
        net_signal.id,
        EntityKind::NetSignal,
        Some((NameScope::NetSignals, &net_signal.name)),
    )?;
    insert_at(&mut graph.net_signals, net_signal.id, net_signal, index);
    Ok(())
}

/// Remove a net signal without net points on any page
///
/// # Errors
/// * `UnknownEntity` - No such net signal
/// * `NonEmptyDependents` - Net points are still attached
pub fn remove_net_signal(
    graph: &mut CircuitGraph,
    id: EntityId,
) -> ValidationResult<(usize, NetSignal)> {
    if !graph.net_signals.contains_key(&id) {
        return Err(unknown(EntityKind::NetSignal, id));
    }
    let count = graph.net_points_of_signal(id).len();
    if count > 0 {
        return Err(ValidationError::NonEmptyDependents {
            kind: EntityKind::NetSignal,
            id,
            dependent_kind: EntityKind::NetPoint,
            count,
        });
    }

    let (index, _, net_signal) = graph
        .net_signals
        .shift_remove_full(&id)
        .ok_or_else(|| unknown(EntityKind::NetSignal, id))?;
    graph
        .registry
        .release(id, Some((NameScope::NetSignals, &net_signal.name)));
    Ok((index, net_signal))
}

/// Rename a net signal and set its auto-name flag
///
/// Returns the previous name and flag. A user rename passes
/// `auto_name = false`, so the signal keeps its name from then on.
pub fn rename_net_signal(
    graph: &mut CircuitGraph,
    id: EntityId,
    name: &str,
    auto_name: bool,
) -> ValidationResult<(String, bool)> {
    let net_signal = graph
        .net_signals
        .get_mut(&id)
        .ok_or_else(|| unknown(EntityKind::NetSignal, id))?;
    graph
        .registry
        .rename(NameScope::NetSignals, id, &net_signal.name, name)?;
    let old_name = std::mem::replace(&mut net_signal.name, name.to_string());
    let old_auto = std::mem::replace(&mut net_signal.auto_name, auto_name);
    Ok((old_name, old_auto))
}
