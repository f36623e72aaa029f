//! Generated names for new net signals and component instances

use super::CircuitGraph;
use crate::registry::NameScope;

/// Prefix of generated net signal names
pub const NET_SIGNAL_NAME_PREFIX: &str = "N#";

/// Designator prefix used for components whose library entry has none
pub const UNKNOWN_PREFIX: &str = "?";

fn first_free(graph: &CircuitGraph, scope: NameScope, prefix: &str) -> String {
    (1u64..)
        .map(|n| format!("{}{}", prefix, n))
        .find(|name| graph.registry.lookup_name(scope, name).is_none())
        .unwrap_or_else(|| prefix.to_string())
}

/// First free name of the form `N#<n>`, counting from 1
pub fn next_net_signal_name(graph: &CircuitGraph) -> String {
    first_free(graph, NameScope::NetSignals, NET_SIGNAL_NAME_PREFIX)
}

/// First free name of the form `<prefix><n>`, counting from 1
pub fn next_component_instance_name(graph: &CircuitGraph, prefix: &str) -> String {
    let prefix = if prefix.trim().is_empty() {
        UNKNOWN_PREFIX
    } else {
        prefix
    };
    first_free(graph, NameScope::ComponentInstances, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::net_ops::{add_net_class, add_net_signal};
    use crate::model::{NetClass, NetSignal};
    use schemx_core_types::EntityId;

    #[test]
    fn test_next_net_signal_name_fills_gaps() {
        let mut graph = CircuitGraph::new();
        let class = EntityId::new();
        add_net_class(&mut graph, NetClass::new(class, "default"), None).unwrap();
        assert_eq!(next_net_signal_name(&graph), "N#1");

        add_net_signal(&mut graph, NetSignal::new(EntityId::new(), "N#1", class), None).unwrap();
        add_net_signal(&mut graph, NetSignal::new(EntityId::new(), "N#3", class), None).unwrap();

        assert_eq!(next_net_signal_name(&graph), "N#2");
    }

    #[test]
    fn test_component_name_prefix_fallback() {
        let graph = CircuitGraph::new();
        assert_eq!(next_component_instance_name(&graph, "R"), "R1");
        assert_eq!(next_component_instance_name(&graph, ""), "?1");
    }
}
