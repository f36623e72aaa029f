//! Project library mutations

use schemx_core_types::EntityId;

use super::{insert_at, CircuitGraph};
use crate::errors::{ValidationError, ValidationResult};
use crate::model::{EntityKind, LibraryComponent};
use crate::registry::NameScope;

/// Add a component definition to the project library
///
/// # Errors
/// * `DuplicateId` - The id is already used by any entity
/// * `EmptyName` / `DuplicateName` - Name invalid within the library
pub fn add_library_component(
    graph: &mut CircuitGraph,
    component: LibraryComponent,
    index: Option<usize>,
) -> ValidationResult<()> {
    graph.registry.claim(
        component.id,
        EntityKind::LibraryComponent,
        Some((NameScope::LibraryComponents, &component.name)),
    )?;
    insert_at(&mut graph.library, component.id, component, index);
    Ok(())
}

/// Remove a component definition, returning its former position and value
///
/// # Errors
/// * `UnknownEntity` - No such library component
/// * `NonEmptyDependents` - Component instances still reference it
pub fn remove_library_component(
    graph: &mut CircuitGraph,
    id: EntityId,
) -> ValidationResult<(usize, LibraryComponent)> {
    if !graph.library.contains_key(&id) {
        return Err(ValidationError::UnknownEntity {
            kind: EntityKind::LibraryComponent,
            id,
        });
    }

    let count = graph
        .component_instances
        .values()
        .filter(|c| c.library_component_id == id)
        .count();
    if count > 0 {
        return Err(ValidationError::NonEmptyDependents {
            kind: EntityKind::LibraryComponent,
            id,
            dependent_kind: EntityKind::ComponentInstance,
            count,
        });
    }

    let (index, _, component) =
        graph
            .library
            .shift_remove_full(&id)
            .ok_or(ValidationError::UnknownEntity {
                kind: EntityKind::LibraryComponent,
                id,
            })?;
    graph.registry.release(
        id,
        Some((NameScope::LibraryComponents, &component.name)),
    );
    Ok((index, component))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::component_ops::add_component_instance;
    use crate::model::ComponentInstance;

    #[test]
    fn test_add_and_remove_library_component() {
        let mut graph = CircuitGraph::new();
        let id = EntityId::new();
        add_library_component(&mut graph, LibraryComponent::new(id, "Resistor", "R"), None)
            .unwrap();

        assert_eq!(graph.library_component(id).unwrap().prefix, "R");

        let (index, removed) = remove_library_component(&mut graph, id).unwrap();
        assert_eq!(index, 0);
        assert_eq!(removed.name, "Resistor");
        assert!(graph.is_empty());
    }

    #[test]
    fn test_remove_referenced_library_component_fails() {
        let mut graph = CircuitGraph::new();
        let lib_id = EntityId::new();
        add_library_component(&mut graph, LibraryComponent::new(lib_id, "Resistor", "R"), None)
            .unwrap();
        add_component_instance(
            &mut graph,
            ComponentInstance::new(EntityId::new(), "R1", lib_id),
            None,
        )
        .unwrap();
        let before = graph.clone();

        let err = remove_library_component(&mut graph, lib_id).unwrap_err();

        assert!(matches!(
            err,
            ValidationError::NonEmptyDependents { count: 1, .. }
        ));
        assert_eq!(graph, before);
    }
}
