#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Project save → reopen
//!
//! ## Scenarios Covered
//!
//! 1. Reopening reproduces the identical graph, including collection order
//! 2. Saving an unchanged reopened project rewrites identical bytes
//! 3. Files of removed pages are deleted on save
//! 4. Invalid file content is reported as InvalidProjectFile

mod common;

use common::{populate, project_path};
use schemx_core::{Command, ExErrorKind};
use schemx_core_types::EntityId;
use schemx_store::format::CIRCUIT_FILE;
use schemx_store::{FixedRecovery, Project};
use tempfile::TempDir;

fn ids<'a>(iter: impl Iterator<Item = &'a EntityId>) -> Vec<EntityId> {
    iter.copied().collect()
}

#[test]
fn test_save_reopen_reproduces_graph() {
    // GIVEN a saved project with content on two pages
    let dir = TempDir::new().unwrap();
    let file = project_path(dir.path(), "amp");
    let mut project = Project::create(&file, "Amplifier").unwrap();
    populate(&mut project);
    project.save().unwrap();
    let saved_graph = project.graph().clone();
    let saved_meta = project.meta().clone();
    project.close().unwrap();

    // WHEN it is reopened
    let reopened = Project::open(&file, &mut FixedRecovery::default()).unwrap();

    // THEN graph and metadata are identical
    assert_eq!(reopened.graph(), &saved_graph);
    assert_eq!(reopened.meta(), &saved_meta);
    assert!(!reopened.has_unsaved_changes());

    // AND names resolve again after loading
    let graph = reopened.graph();
    assert!(graph.component_instance_by_name("R1").is_some());
    assert!(graph.schematic_by_name("Power").is_some());

    // AND every collection keeps its order
    assert_eq!(
        ids(graph.net_classes().map(|c| &c.id)),
        ids(saved_graph.net_classes().map(|c| &c.id))
    );
    assert_eq!(
        ids(graph.net_signals().map(|s| &s.id)),
        ids(saved_graph.net_signals().map(|s| &s.id))
    );
    assert_eq!(
        ids(graph.schematics().map(|s| &s.id)),
        ids(saved_graph.schematics().map(|s| &s.id))
    );
    for page in graph.schematics() {
        let saved_page = saved_graph.schematic(page.id).unwrap();
        assert_eq!(
            ids(page.net_points().map(|p| &p.id)),
            ids(saved_page.net_points().map(|p| &p.id))
        );
    }
}

#[test]
fn test_resave_is_byte_identical() {
    // GIVEN a saved project
    let dir = TempDir::new().unwrap();
    let file = project_path(dir.path(), "amp");
    let mut project = Project::create(&file, "Amplifier").unwrap();
    let populated = populate(&mut project);
    project.save().unwrap();
    let page_path = project.schematic_path(populated.main_page);
    let circuit_path = dir.path().join("amp").join(CIRCUIT_FILE);
    let before = (
        std::fs::read(&file).unwrap(),
        std::fs::read(&circuit_path).unwrap(),
        std::fs::read(&page_path).unwrap(),
    );
    project.close().unwrap();

    // WHEN it is reopened and saved again
    let mut reopened = Project::open(&file, &mut FixedRecovery::default()).unwrap();
    reopened.save().unwrap();

    // THEN every file has the same bytes
    assert_eq!(std::fs::read(&file).unwrap(), before.0);
    assert_eq!(std::fs::read(&circuit_path).unwrap(), before.1);
    assert_eq!(std::fs::read(&page_path).unwrap(), before.2);
}

#[test]
fn test_removed_page_file_is_deleted_on_save() {
    // GIVEN a saved project with an empty second page
    let dir = TempDir::new().unwrap();
    let file = project_path(dir.path(), "amp");
    let mut project = Project::create(&file, "Amplifier").unwrap();
    let page = EntityId::new();
    project
        .document_mut()
        .execute(Command::add_schematic(page, "Spare"))
        .unwrap();
    project.save().unwrap();
    let page_path = project.schematic_path(page);
    assert!(page_path.is_file());

    // WHEN the page is removed and the project saved
    project
        .document_mut()
        .execute(Command::RemoveSchematic { id: page })
        .unwrap();
    project.save().unwrap();

    // THEN the page file is gone and the project reopens without it
    assert!(!page_path.exists());
    project.close().unwrap();
    let reopened = Project::open(&file, &mut FixedRecovery::default()).unwrap();
    assert!(reopened.graph().schematic(page).is_none());
}

#[test]
fn test_corrupt_circuit_file_is_invalid_project() {
    // GIVEN a saved project whose circuit file is truncated
    let dir = TempDir::new().unwrap();
    let file = project_path(dir.path(), "amp");
    Project::create(&file, "Amplifier").unwrap().close().unwrap();
    std::fs::write(dir.path().join("amp").join(CIRCUIT_FILE), "<circuit><netclasses>").unwrap();

    // WHEN it is opened
    let err = Project::open(&file, &mut FixedRecovery::default()).unwrap_err();

    // THEN the error names the file and keeps the syntax error as cause
    assert_eq!(err.kind(), ExErrorKind::InvalidProjectFile);
    assert!(err.message().contains("circuit.xml"));
    assert_eq!(err.source_error().map(|e| e.kind()), Some(ExErrorKind::XmlSyntax));

    // AND the lock is not left behind
    assert!(!schemx_store::lock::lock_path_for(&file).exists());
}

#[test]
fn test_wrong_root_is_invalid_project() {
    let dir = TempDir::new().unwrap();
    let file = project_path(dir.path(), "amp");
    Project::create(&file, "Amplifier").unwrap().close().unwrap();
    std::fs::write(dir.path().join("amp").join(CIRCUIT_FILE), "<schematic/>").unwrap();

    let err = Project::open(&file, &mut FixedRecovery::default()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidProjectFile);
    assert_eq!(err.source_error().map(|e| e.kind()), Some(ExErrorKind::InvalidRootNode));
}
