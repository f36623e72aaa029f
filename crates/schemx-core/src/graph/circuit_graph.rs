use indexmap::IndexMap;
use schemx_core_types::EntityId;

use crate::errors::{ValidationError, ValidationResult};
use crate::model::{
    ComponentInstance, EntityKind, LibraryComponent, NetClass, NetPoint, NetSignal, Schematic,
};
use crate::registry::{IdentityRegistry, NameScope};

/// Name of the net class every new project starts with
pub const DEFAULT_NET_CLASS_NAME: &str = "default";

/// In-memory circuit of one project
///
/// Owns the project library, the project-wide net classes, net signals and
/// component instances, and all schematic pages. Every collection keeps
/// insertion order. Mutation goes through the `*_ops` modules, which validate
/// fully before touching any collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitGraph {
    pub(crate) registry: IdentityRegistry,
    pub(crate) library: IndexMap<EntityId, LibraryComponent>,
    pub(crate) net_classes: IndexMap<EntityId, NetClass>,
    pub(crate) net_signals: IndexMap<EntityId, NetSignal>,
    pub(crate) component_instances: IndexMap<EntityId, ComponentInstance>,
    pub(crate) schematics: IndexMap<EntityId, Schematic>,
}

impl CircuitGraph {
    /// Create an empty graph without any net class
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph holding only the default net class
    pub fn with_default_net_class() -> Self {
        let mut graph = Self::new();
        let added = graph.ensure_default_net_class();
        debug_assert!(
            matches!(added, Ok(Some(_))),
            "default net class rejected by an empty graph: {:?}",
            added
        );
        graph
    }

    /// Add the default net class if the graph has no net class at all
    ///
    /// Returns the id of the added class.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` only if a foreign entity already claims the
    /// default name, which cannot happen for a graph without net classes.
    pub fn ensure_default_net_class(&mut self) -> ValidationResult<Option<EntityId>> {
        if !self.net_classes.is_empty() {
            return Ok(None);
        }
        let id = EntityId::new();
        super::net_ops::add_net_class(self, NetClass::new(id, DEFAULT_NET_CLASS_NAME), None)?;
        Ok(Some(id))
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Number of live entities of every kind
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    // ----- library -----

    pub fn library_component(&self, id: EntityId) -> Option<&LibraryComponent> {
        self.library.get(&id)
    }

    pub fn library_components(&self) -> impl Iterator<Item = &LibraryComponent> {
        self.library.values()
    }

    // ----- circuit -----

    pub fn net_class(&self, id: EntityId) -> Option<&NetClass> {
        self.net_classes.get(&id)
    }

    pub fn net_classes(&self) -> impl Iterator<Item = &NetClass> {
        self.net_classes.values()
    }

    pub fn net_class_by_name(&self, name: &str) -> Option<&NetClass> {
        let id = self.registry.lookup_name(NameScope::NetClasses, name)?;
        self.net_classes.get(&id)
    }

    pub fn net_signal(&self, id: EntityId) -> Option<&NetSignal> {
        self.net_signals.get(&id)
    }

    pub fn net_signals(&self) -> impl Iterator<Item = &NetSignal> {
        self.net_signals.values()
    }

    pub fn net_signal_by_name(&self, name: &str) -> Option<&NetSignal> {
        let id = self.registry.lookup_name(NameScope::NetSignals, name)?;
        self.net_signals.get(&id)
    }

    pub fn signals_of_class(&self, net_class_id: EntityId) -> impl Iterator<Item = &NetSignal> {
        self.net_signals
            .values()
            .filter(move |s| s.net_class_id == net_class_id)
    }

    pub fn component_instance(&self, id: EntityId) -> Option<&ComponentInstance> {
        self.component_instances.get(&id)
    }

    pub fn component_instances(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.component_instances.values()
    }

    pub fn component_instance_by_name(&self, name: &str) -> Option<&ComponentInstance> {
        let id = self
            .registry
            .lookup_name(NameScope::ComponentInstances, name)?;
        self.component_instances.get(&id)
    }

    // ----- schematics -----

    pub fn schematic(&self, id: EntityId) -> Option<&Schematic> {
        self.schematics.get(&id)
    }

    pub fn schematics(&self) -> impl Iterator<Item = &Schematic> {
        self.schematics.values()
    }

    pub fn schematic_by_name(&self, name: &str) -> Option<&Schematic> {
        let id = self.registry.lookup_name(NameScope::Schematics, name)?;
        self.schematics.get(&id)
    }

    /// Net points of `net_signal_id` across all pages, with their page id
    pub fn net_points_of_signal(&self, net_signal_id: EntityId) -> Vec<(EntityId, &NetPoint)> {
        self.schematics
            .values()
            .flat_map(|s| {
                s.net_points
                    .values()
                    .filter(move |p| p.net_signal_id == net_signal_id)
                    .map(move |p| (s.id, p))
            })
            .collect()
    }

    pub(crate) fn schematic_or_err(&self, id: EntityId) -> ValidationResult<&Schematic> {
        self.schematics
            .get(&id)
            .ok_or(ValidationError::UnknownEntity {
                kind: EntityKind::Schematic,
                id,
            })
    }

    pub(crate) fn schematic_mut_or_err(&mut self, id: EntityId) -> ValidationResult<&mut Schematic> {
        self.schematics
            .get_mut(&id)
            .ok_or(ValidationError::UnknownEntity {
                kind: EntityKind::Schematic,
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_is_empty() {
        let graph = CircuitGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.net_classes().count(), 0);
    }

    #[test]
    fn test_default_net_class() {
        let graph = CircuitGraph::with_default_net_class();
        let class = graph.net_class_by_name(DEFAULT_NET_CLASS_NAME).unwrap();
        assert_eq!(graph.registry().kind_of(class.id), Some(EntityKind::NetClass));
        assert_eq!(graph.entity_count(), 1);
    }

    #[test]
    fn test_ensure_default_net_class_only_when_missing() {
        let mut graph = CircuitGraph::new();
        let added = graph.ensure_default_net_class().unwrap();
        assert!(added.is_some());
        assert_eq!(graph.ensure_default_net_class().unwrap(), None);
        assert_eq!(graph.net_classes().count(), 1);
    }
}
