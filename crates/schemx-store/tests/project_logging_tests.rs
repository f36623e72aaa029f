#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Project operations emit canonical start/end events

use schemx_core::logging_facility::init_test_capture;
use schemx_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_FILE_COUNT, FIELD_PATH,
};
use schemx_store::{FixedRecovery, Project};
use tempfile::TempDir;

#[test]
fn test_open_and_save_are_logged() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("p.scx");

    // GIVEN a created project (create saves once)
    let project = Project::create(&file, "P").unwrap();
    let saves = capture.events_for_op("project_save");
    assert_eq!(saves.len(), 2);
    assert_eq!(saves[0].event.as_deref(), Some(EVENT_START));
    let shown = file.display().to_string();
    assert_eq!(saves[0].field(FIELD_PATH), Some(shown.as_str()));
    assert_eq!(saves[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(saves[1].field(FIELD_FILE_COUNT), Some("2"));
    project.close().unwrap();

    // WHEN it is opened twice at once
    let open = Project::open(&file, &mut FixedRecovery::default()).unwrap();
    let _ = Project::open(&file, &mut FixedRecovery::default());

    // THEN the second open ends with the lock error
    let opens = capture.events_for_op("project_open");
    assert_eq!(opens.len(), 4);
    assert_eq!(opens[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(opens[3].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(opens[3].field(FIELD_ERR_CODE), Some("ERR_ALREADY_LOCKED"));
    drop(open);
}
