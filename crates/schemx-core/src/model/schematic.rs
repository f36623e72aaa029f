//! Schematic pages and the items drawn on them

use indexmap::IndexMap;
use schemx_core_types::{Angle, EntityId, Length, Point};
use serde::{Deserialize, Serialize};

/// A schematic page
///
/// The page exclusively owns its symbols, net points and net lines. Each
/// collection keeps insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schematic {
    pub id: EntityId,
    pub name: String,
    pub(crate) symbols: IndexMap<EntityId, SymbolInstance>,
    pub(crate) net_points: IndexMap<EntityId, NetPoint>,
    pub(crate) net_lines: IndexMap<EntityId, NetLine>,
}

impl Schematic {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            symbols: IndexMap::new(),
            net_points: IndexMap::new(),
            net_lines: IndexMap::new(),
        }
    }

    pub fn symbol(&self, id: EntityId) -> Option<&SymbolInstance> {
        self.symbols.get(&id)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &SymbolInstance> {
        self.symbols.values()
    }

    pub fn net_point(&self, id: EntityId) -> Option<&NetPoint> {
        self.net_points.get(&id)
    }

    pub fn net_points(&self) -> impl Iterator<Item = &NetPoint> {
        self.net_points.values()
    }

    pub fn net_line(&self, id: EntityId) -> Option<&NetLine> {
        self.net_lines.get(&id)
    }

    pub fn net_lines(&self) -> impl Iterator<Item = &NetLine> {
        self.net_lines.values()
    }

    /// Total number of items on the page
    pub fn item_count(&self) -> usize {
        self.symbols.len() + self.net_points.len() + self.net_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Net lines with `point_id` as one of their endpoints
    pub fn lines_of_point(&self, point_id: EntityId) -> Vec<&NetLine> {
        self.net_lines
            .values()
            .filter(|l| l.connects(point_id))
            .collect()
    }

    /// Net point located exactly at `position`, if any
    pub fn net_point_at(&self, position: Point) -> Option<&NetPoint> {
        self.net_points.values().find(|p| p.position == position)
    }
}

/// Placement of a component instance's symbol on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInstance {
    pub id: EntityId,
    pub component_instance_id: EntityId,
    pub position: Point,
    pub rotation: Angle,
}

impl SymbolInstance {
    pub fn new(id: EntityId, component_instance_id: EntityId, position: Point) -> Self {
        Self {
            id,
            component_instance_id,
            position,
            rotation: Angle::default(),
        }
    }

    pub fn with_rotation(mut self, rotation: Angle) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Attachment of a net point to one pin of a symbol on the same page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolPinRef {
    pub symbol_id: EntityId,
    pub pin_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPoint {
    pub id: EntityId,
    pub net_signal_id: EntityId,
    pub position: Point,
    pub pin: Option<SymbolPinRef>,
}

impl NetPoint {
    pub fn new(id: EntityId, net_signal_id: EntityId, position: Point) -> Self {
        Self {
            id,
            net_signal_id,
            position,
            pin: None,
        }
    }

    pub fn attached_to(mut self, pin: SymbolPinRef) -> Self {
        self.pin = Some(pin);
        self
    }
}

/// Straight wire segment between two net points of the same page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetLine {
    pub id: EntityId,
    pub start_point_id: EntityId,
    pub end_point_id: EntityId,
    pub width: Length,
}

/// Default wire width, 0.15875 mm
pub const DEFAULT_LINE_WIDTH: Length = Length::from_nm(158_750);

impl NetLine {
    pub fn new(id: EntityId, start_point_id: EntityId, end_point_id: EntityId) -> Self {
        Self {
            id,
            start_point_id,
            end_point_id,
            width: DEFAULT_LINE_WIDTH,
        }
    }

    pub fn with_width(mut self, width: Length) -> Self {
        self.width = width;
        self
    }

    pub fn connects(&self, point_id: EntityId) -> bool {
        self.start_point_id == point_id || self.end_point_id == point_id
    }
}
