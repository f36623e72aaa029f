#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Redo against a graph changed outside the history
//!
//! GIVEN a committed unit [add net signal S1, add net class X] that was undone
//! AND a net class named "X" added afterwards without history
//! WHEN the unit is redone
//! THEN strict mode reports a consistency fault and changes nothing
//! AND lenient mode applies S1, skips X, and a later undo reverts only S1

mod common;

use common::{default_class_id, new_document};
use schemx_core::model::{NetClass, NetSignal};
use schemx_core::{
    Command, Document, RedoValidation, SchemError, ValidationError,
};
use schemx_core_types::EntityId;

struct Setup {
    doc: Document,
    signal_id: EntityId,
    history_class_id: EntityId,
    external_class_id: EntityId,
}

fn setup(mode: RedoValidation) -> Setup {
    let mut doc = new_document();
    doc.set_redo_validation(mode);
    let class = default_class_id(&doc);
    let signal_id = EntityId::new();
    let history_class_id = EntityId::new();

    doc.execute_all(
        "Setup",
        vec![
            Command::add_net_signal(NetSignal::new(signal_id, "S1", class)),
            Command::add_net_class(NetClass::new(history_class_id, "X")),
        ],
    )
    .unwrap();
    doc.undo().unwrap();

    let external_class_id = EntityId::new();
    doc.execute_untracked(&Command::add_net_class(NetClass::new(external_class_id, "X")))
        .unwrap();

    Setup {
        doc,
        signal_id,
        history_class_id,
        external_class_id,
    }
}

#[test]
fn test_strict_redo_reports_fault_and_changes_nothing() {
    // GIVEN the conflicting setup in strict mode
    let Setup { mut doc, .. } = setup(RedoValidation::Strict);
    let before = doc.graph().clone();

    // WHEN redo is attempted
    let err = doc.redo().unwrap_err();

    // THEN a consistency fault is reported
    assert!(err.is_fatal());
    assert!(matches!(
        err,
        SchemError::ConsistencyFault {
            ref op,
            source: ValidationError::DuplicateName { .. },
            ..
        } if op == "redo"
    ));

    // AND the graph and the history pointer are unchanged
    assert_eq!(doc.graph(), &before);
    assert_eq!(doc.undo_stack().index(), 0);
    assert!(doc.undo_stack().can_redo());
}

#[test]
fn test_lenient_redo_skips_failing_step() {
    // GIVEN the conflicting setup in lenient mode
    let Setup {
        mut doc,
        signal_id,
        history_class_id,
        external_class_id,
    } = setup(RedoValidation::Lenient);
    let before = doc.graph().clone();

    // WHEN redo is performed
    let outcome = doc.redo().unwrap();

    // THEN S1 is applied and the net class step is reported as skipped
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].0, 1);
    assert!(matches!(
        outcome.skipped[0].1,
        ValidationError::DuplicateName { .. }
    ));
    assert!(doc.graph().net_signal(signal_id).is_some());
    assert!(doc.graph().net_class(history_class_id).is_none());
    assert_eq!(doc.graph().net_class_by_name("X").unwrap().id, external_class_id);
    assert_eq!(doc.undo_stack().index(), 1);

    // WHEN the unit is undone again
    doc.undo().unwrap();

    // THEN only S1 is reverted; the external class survives
    assert_eq!(doc.graph(), &before);
}

#[test]
fn test_lenient_redo_without_conflict_is_complete() {
    // GIVEN an undone unit and no external change
    let mut doc = new_document();
    doc.set_redo_validation(RedoValidation::Lenient);
    let class = default_class_id(&doc);
    doc.execute(Command::add_net_signal(NetSignal::new(EntityId::new(), "S1", class)))
        .unwrap();
    let after = doc.graph().clone();
    doc.undo().unwrap();

    // WHEN it is redone
    let outcome = doc.redo().unwrap();

    // THEN nothing is skipped
    assert!(outcome.is_complete());
    assert_eq!(doc.graph(), &after);
}
