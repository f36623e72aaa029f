#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Property: undoing every committed edit reproduces the starting graph, and
//! redoing them all reproduces the final graph. Failed edits never mutate.

use proptest::prelude::*;
use schemx_core::model::{NetClass, NetLine, NetPoint, NetSignal};
use schemx_core::{CircuitGraph, Command, Document};
use schemx_core_types::{EntityId, Point};

const NAMES: [&str; 4] = ["GND", "VCC", "N#1", "SDA"];

#[derive(Debug, Clone)]
enum Op {
    AddNetClass(usize),
    RemoveNetClass(usize),
    RenameNetClass(usize, usize),
    AddNetSignal(usize, usize),
    RemoveNetSignal(usize),
    AddSchematic(usize),
    RemoveSchematic(usize),
    AddNetPoint(usize, usize, i64),
    RemoveNetPoint(usize, usize),
    MoveNetPoint(usize, usize, i64),
    AddNetLine(usize, usize, usize),
    RemoveNetLine(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize).prop_map(Op::AddNetClass),
        (0..4usize).prop_map(Op::RemoveNetClass),
        (0..4usize, 0..4usize).prop_map(|(a, b)| Op::RenameNetClass(a, b)),
        (0..4usize, 0..4usize).prop_map(|(a, b)| Op::AddNetSignal(a, b)),
        (0..4usize).prop_map(Op::RemoveNetSignal),
        (0..4usize).prop_map(Op::AddSchematic),
        (0..4usize).prop_map(Op::RemoveSchematic),
        (0..4usize, 0..4usize, -5..5i64).prop_map(|(a, b, x)| Op::AddNetPoint(a, b, x)),
        (0..4usize, 0..8usize).prop_map(|(a, b)| Op::RemoveNetPoint(a, b)),
        (0..4usize, 0..8usize, -5..5i64).prop_map(|(a, b, x)| Op::MoveNetPoint(a, b, x)),
        (0..4usize, 0..8usize, 0..8usize).prop_map(|(a, b, c)| Op::AddNetLine(a, b, c)),
        (0..4usize, 0..8usize).prop_map(|(a, b)| Op::RemoveNetLine(a, b)),
    ]
}

/// Pick the n-th element, or a fresh id that resolves to nothing
fn pick(ids: &[EntityId], n: usize) -> EntityId {
    if ids.is_empty() {
        EntityId::new()
    } else {
        ids[n % ids.len()]
    }
}

fn to_command(graph: &CircuitGraph, op: &Op) -> Command {
    let classes: Vec<EntityId> = graph.net_classes().map(|c| c.id).collect();
    let signals: Vec<EntityId> = graph.net_signals().map(|s| s.id).collect();
    let pages: Vec<EntityId> = graph.schematics().map(|s| s.id).collect();
    let points = |page: EntityId| -> Vec<EntityId> {
        graph
            .schematic(page)
            .map(|s| s.net_points().map(|p| p.id).collect())
            .unwrap_or_default()
    };
    let lines = |page: EntityId| -> Vec<EntityId> {
        graph
            .schematic(page)
            .map(|s| s.net_lines().map(|l| l.id).collect())
            .unwrap_or_default()
    };

    match *op {
        Op::AddNetClass(n) => Command::add_net_class(NetClass::new(EntityId::new(), NAMES[n])),
        Op::RemoveNetClass(n) => Command::RemoveNetClass {
            id: pick(&classes, n),
        },
        Op::RenameNetClass(n, name) => Command::RenameNetClass {
            id: pick(&classes, n),
            name: NAMES[name].to_string(),
        },
        Op::AddNetSignal(name, class) => Command::add_net_signal(NetSignal::new(
            EntityId::new(),
            NAMES[name],
            pick(&classes, class),
        )),
        Op::RemoveNetSignal(n) => Command::RemoveNetSignal {
            id: pick(&signals, n),
        },
        Op::AddSchematic(name) => Command::add_schematic(EntityId::new(), NAMES[name]),
        Op::RemoveSchematic(n) => Command::RemoveSchematic {
            id: pick(&pages, n),
        },
        Op::AddNetPoint(page, signal, x) => Command::add_net_point(
            pick(&pages, page),
            NetPoint::new(EntityId::new(), pick(&signals, signal), Point::from_nm(x, 0)),
        ),
        Op::RemoveNetPoint(page, n) => {
            let page = pick(&pages, page);
            Command::RemoveNetPoint {
                schematic_id: page,
                id: pick(&points(page), n),
            }
        }
        Op::MoveNetPoint(page, n, y) => {
            let page = pick(&pages, page);
            Command::MoveNetPoint {
                schematic_id: page,
                id: pick(&points(page), n),
                position: Point::from_nm(0, y),
            }
        }
        Op::AddNetLine(page, a, b) => {
            let page = pick(&pages, page);
            let pts = points(page);
            Command::add_net_line(
                page,
                NetLine::new(EntityId::new(), pick(&pts, a), pick(&pts, b)),
            )
        }
        Op::RemoveNetLine(page, n) => {
            let page = pick(&pages, page);
            Command::RemoveNetLine {
                schematic_id: page,
                id: pick(&lines(page), n),
            }
        }
    }
}

/// Every id in collection iteration order; map equality ignores order
fn ordering(graph: &CircuitGraph) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = graph.net_classes().map(|c| c.id).collect();
    ids.extend(graph.net_signals().map(|s| s.id));
    for page in graph.schematics() {
        ids.push(page.id);
        ids.extend(page.net_points().map(|p| p.id));
        ids.extend(page.net_lines().map(|l| l.id));
    }
    ids
}

proptest! {
    #[test]
    fn undo_to_start_restores_initial_graph(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut doc = Document::new(CircuitGraph::with_default_net_class());
        let initial = doc.graph().clone();

        for op in &ops {
            let cmd = to_command(doc.graph(), op);
            let before = doc.graph().clone();
            if doc.execute(cmd).is_err() {
                prop_assert_eq!(doc.graph(), &before);
            }
        }
        let last = doc.graph().clone();

        while doc.undo_stack().can_undo() {
            doc.undo().unwrap();
        }
        prop_assert_eq!(doc.graph(), &initial);
        prop_assert_eq!(ordering(doc.graph()), ordering(&initial));

        while doc.undo_stack().can_redo() {
            let outcome = doc.redo().unwrap();
            prop_assert!(outcome.is_complete());
        }
        prop_assert_eq!(doc.graph(), &last);
        prop_assert_eq!(ordering(doc.graph()), ordering(&last));
    }
}
