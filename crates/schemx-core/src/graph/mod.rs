pub mod circuit_graph;
pub mod component_ops;
pub mod library_ops;
pub mod naming;
pub mod net_ops;
pub mod schematic_ops;

pub use circuit_graph::{CircuitGraph, DEFAULT_NET_CLASS_NAME};

use indexmap::IndexMap;
use schemx_core_types::EntityId;

/// Insert at `index` (clamped to the end), or append when no index is given
pub(crate) fn insert_at<V>(map: &mut IndexMap<EntityId, V>, id: EntityId, value: V, index: Option<usize>) {
    match index {
        Some(index) => {
            let index = index.min(map.len());
            map.shift_insert(index, id, value);
        }
        None => {
            map.insert(id, value);
        }
    }
}
