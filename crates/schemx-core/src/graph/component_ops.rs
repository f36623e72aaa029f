//! Component instance mutations

use schemx_core_types::EntityId;

use super::{insert_at, CircuitGraph};
use crate::errors::{ValidationError, ValidationResult};
use crate::model::{ComponentInstance, EntityKind};
use crate::registry::NameScope;

/// Add a component instance of a library component
///
/// # Errors
/// * `DanglingReference` - The library component does not exist
/// * `DuplicateId`, `EmptyName`, `DuplicateName`
pub fn add_component_instance(
    graph: &mut CircuitGraph,
    instance: ComponentInstance,
    index: Option<usize>,
) -> ValidationResult<()> {
    if !graph.library.contains_key(&instance.library_component_id) {
        return Err(ValidationError::DanglingReference {
            kind: EntityKind::ComponentInstance,
            id: instance.id,
            target_kind: EntityKind::LibraryComponent,
            target_id: instance.library_component_id,
        });
    }
    graph.registry.claim(
        instance.id,
        EntityKind::ComponentInstance,
        Some((NameScope::ComponentInstances, &instance.name)),
    )?;
    insert_at(&mut graph.component_instances, instance.id, instance, index);
    Ok(())
}

/// Remove a component instance that is not placed on any page
///
/// # Errors
/// * `UnknownEntity` - No such component instance
/// * `NonEmptyDependents` - Symbols still place the instance
pub fn remove_component_instance(
    graph: &mut CircuitGraph,
    id: EntityId,
) -> ValidationResult<(usize, ComponentInstance)> {
    let unknown = || ValidationError::UnknownEntity {
        kind: EntityKind::ComponentInstance,
        id,
    };
    if !graph.component_instances.contains_key(&id) {
        return Err(unknown());
    }

    let count = graph
        .schematics
        .values()
        .flat_map(|s| s.symbols.values())
        .filter(|sym| sym.component_instance_id == id)
        .count();
    if count > 0 {
        return Err(ValidationError::NonEmptyDependents {
            kind: EntityKind::ComponentInstance,
            id,
            dependent_kind: EntityKind::SymbolInstance,
            count,
        });
    }

    let (index, _, instance) = graph
        .component_instances
        .shift_remove_full(&id)
        .ok_or_else(unknown)?;
    graph
        .registry
        .release(id, Some((NameScope::ComponentInstances, &instance.name)));
    Ok((index, instance))
}

/// Rename a component instance, returning the previous name
pub fn rename_component_instance(
    graph: &mut CircuitGraph,
    id: EntityId,
    name: &str,
) -> ValidationResult<String> {
    let instance = graph
        .component_instances
        .get_mut(&id)
        .ok_or(ValidationError::UnknownEntity {
            kind: EntityKind::ComponentInstance,
            id,
        })?;
    graph
        .registry
        .rename(NameScope::ComponentInstances, id, &instance.name, name)?;
    Ok(std::mem::replace(&mut instance.name, name.to_string()))
}
