//! Wire drawing as one composite edit
//!
//! Drawing a wire touches several entities at once: the start point (reused
//! if one already sits at the start position), possibly a new net signal and
//! net class, the end point and the line. `DrawWire` computes the command
//! list up front so the whole wire can be applied as a single undo unit.

use schemx_core_types::{EntityId, Length, Point};

use crate::commands::Command;
use crate::errors::{ValidationError, ValidationResult};
use crate::graph::naming::next_net_signal_name;
use crate::graph::{CircuitGraph, DEFAULT_NET_CLASS_NAME};
use crate::model::{NetClass, NetLine, NetPoint, NetSignal, DEFAULT_LINE_WIDTH};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawWire {
    schematic_id: EntityId,
    from: Point,
    to: Point,
    net_signal_id: Option<EntityId>,
    net_class_name: Option<String>,
    width: Length,
}

/// Ids of the entities making up a drawn wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireIds {
    pub net_signal_id: EntityId,
    pub start_point_id: EntityId,
    pub end_point_id: EntityId,
    pub line_id: EntityId,
    /// True if the wire created its net signal
    pub created_net_signal: bool,
}

impl DrawWire {
    pub fn new(schematic_id: EntityId, from: Point, to: Point) -> Self {
        Self {
            schematic_id,
            from,
            to,
            net_signal_id: None,
            net_class_name: None,
            width: DEFAULT_LINE_WIDTH,
        }
    }

    /// Put new points on an existing net signal instead of creating one
    pub fn on_net_signal(mut self, net_signal_id: EntityId) -> Self {
        self.net_signal_id = Some(net_signal_id);
        self
    }

    /// Net class for a created net signal; created itself if missing
    pub fn in_net_class(mut self, name: impl Into<String>) -> Self {
        self.net_class_name = Some(name.into());
        self
    }

    pub fn with_width(mut self, width: Length) -> Self {
        self.width = width;
        self
    }

    pub fn schematic_id(&self) -> EntityId {
        self.schematic_id
    }

    /// Compute the commands drawing this wire on the current `graph`
    ///
    /// The commands are not applied. Validation of references happens when
    /// they are; only the page is checked here.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the page does not exist and
    /// `DegenerateNetLine` if the wire starts and ends at the same position.
    pub fn build(&self, graph: &CircuitGraph) -> ValidationResult<(Vec<Command>, WireIds)> {
        let page = graph.schematic_or_err(self.schematic_id)?;
        let line_id = EntityId::new();
        if self.to == self.from {
            let point_id = page
                .net_point_at(self.from)
                .map(|p| p.id)
                .unwrap_or_else(EntityId::new);
            return Err(ValidationError::DegenerateNetLine { line_id, point_id });
        }
        let mut commands = Vec::new();

        let existing_start = page.net_point_at(self.from);
        let mut created_net_signal = false;
        let net_signal_id = match (existing_start, self.net_signal_id) {
            (Some(point), _) => point.net_signal_id,
            (None, Some(id)) => id,
            (None, None) => {
                let net_class_id = self.resolve_net_class(graph, &mut commands);
                let id = EntityId::new();
                commands.push(Command::add_net_signal(
                    NetSignal::new(id, next_net_signal_name(graph), net_class_id).with_auto_name(true),
                ));
                created_net_signal = true;
                id
            }
        };

        let start_point_id = match existing_start {
            Some(point) => point.id,
            None => {
                let id = EntityId::new();
                commands.push(Command::add_net_point(
                    self.schematic_id,
                    NetPoint::new(id, net_signal_id, self.from),
                ));
                id
            }
        };

        let end_point_id = match page.net_point_at(self.to) {
            Some(point) => point.id,
            None => {
                let id = EntityId::new();
                commands.push(Command::add_net_point(
                    self.schematic_id,
                    NetPoint::new(id, net_signal_id, self.to),
                ));
                id
            }
        };

        commands.push(Command::add_net_line(
            self.schematic_id,
            NetLine::new(line_id, start_point_id, end_point_id).with_width(self.width),
        ));

        Ok((
            commands,
            WireIds {
                net_signal_id,
                start_point_id,
                end_point_id,
                line_id,
                created_net_signal,
            },
        ))
    }

    fn resolve_net_class(&self, graph: &CircuitGraph, commands: &mut Vec<Command>) -> EntityId {
        let name = self
            .net_class_name
            .as_deref()
            .unwrap_or(DEFAULT_NET_CLASS_NAME);
        if let Some(class) = graph.net_class_by_name(name) {
            return class.id;
        }
        if self.net_class_name.is_none() {
            if let Some(class) = graph.net_classes().next() {
                return class.id;
            }
        }
        let id = EntityId::new();
        commands.push(Command::add_net_class(NetClass::new(id, name)));
        id
    }
}
