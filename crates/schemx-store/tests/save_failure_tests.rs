#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Best-effort saving across files
//!
//! ## Scenarios Covered
//!
//! 1. A page file that cannot be replaced fails the save, the other files
//!    are still written and the failure is reported
//! 2. The document stays dirty after a failed save and saves cleanly once
//!    the obstacle is gone

mod common;

use common::{populate, project_path};
use schemx_core::model::NetClass;
use schemx_core::{Command, ExErrorKind};
use schemx_core_types::EntityId;
use schemx_store::format::CIRCUIT_FILE;
use schemx_store::Project;
use tempfile::TempDir;

#[test]
fn test_failing_page_does_not_stop_other_files() {
    // GIVEN a saved project whose second page file is replaced by a directory
    let dir = TempDir::new().unwrap();
    let file = project_path(dir.path(), "amp");
    let mut project = Project::create(&file, "Amplifier").unwrap();
    let populated = populate(&mut project);
    project.save().unwrap();
    let blocked = project.schematic_path(populated.second_page);
    std::fs::remove_file(&blocked).unwrap();
    std::fs::create_dir(&blocked).unwrap();

    // WHEN a new net class is added and the project saved
    project
        .document_mut()
        .execute(Command::add_net_class(NetClass::new(EntityId::new(), "analog")))
        .unwrap();
    let err = project.save().unwrap_err();

    // THEN the save reports exactly the blocked page
    assert_eq!(err.kind(), ExErrorKind::SaveFailed);
    assert!(err.message().starts_with("1 file(s)"));
    assert!(err.message().contains(&populated.second_page.to_string()));
    assert_eq!(err.source_error().map(|e| e.kind()), Some(ExErrorKind::Io));

    // AND the circuit file was still updated
    let circuit = std::fs::read_to_string(dir.path().join("amp").join(CIRCUIT_FILE)).unwrap();
    assert!(circuit.contains("analog"));

    // AND the project still has unsaved changes
    assert!(project.has_unsaved_changes());

    // WHEN the obstacle is removed
    std::fs::remove_dir(&blocked).unwrap();
    project.save().unwrap();

    // THEN the save succeeds
    assert!(blocked.is_file());
    assert!(!project.has_unsaved_changes());
}
