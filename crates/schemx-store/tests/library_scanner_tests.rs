#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Library scanner progress and cancellation
//!
//! ## Scenarios Covered
//!
//! 1. A background scan reports increasing progress and then the index
//! 2. Cancelling during a scan stops it at the next file
//! 3. Dropping a running scanner does not hang

use std::sync::atomic::{AtomicBool, Ordering};

use schemx_core_types::EntityId;
use schemx_store::scanner::scan;
use schemx_store::{LibraryScanner, ScanEvent};
use tempfile::TempDir;

fn library_with(count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("cmp")).unwrap();
    for i in 0..count {
        std::fs::write(
            dir.path().join("cmp").join(format!("c{:03}.xml", i)),
            format!(r#"<component uuid="{}" name="C{}"/>"#, EntityId::new(), i),
        )
        .unwrap();
    }
    dir
}

#[test]
fn test_background_scan_reports_progress_then_finishes() {
    // GIVEN a library of five components
    let dir = library_with(5);

    // WHEN it is scanned in the background
    let events = LibraryScanner::start(dir.path().to_path_buf()).wait();

    // THEN progress counts up to the total
    let progress: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Progress { done, total } => Some((*done, *total)),
            _ => None,
        })
        .collect();
    assert_eq!(progress, (1..=5).map(|d| (d, 5)).collect::<Vec<_>>());

    // AND the scan finishes with every component
    match events.last().unwrap() {
        ScanEvent::Finished { entries, skipped } => {
            assert_eq!(entries.len(), 5);
            assert_eq!(*skipped, 0);
            assert_eq!(entries[0].name.as_deref(), Some("C0"));
        }
        other => panic!("expected Finished, got {:?}", other),
    }
}

#[test]
fn test_cancel_stops_at_next_file() {
    // GIVEN a library of ten components
    let dir = library_with(10);
    let cancel = AtomicBool::new(false);
    let mut events = Vec::new();

    // WHEN cancellation is requested after the second file
    scan(dir.path(), &cancel, |event| {
        if matches!(event, ScanEvent::Progress { done: 2, .. }) {
            cancel.store(true, Ordering::Relaxed);
        }
        events.push(event);
    });

    // THEN the scan ends with Cancelled right after it
    assert_eq!(events.len(), 3);
    assert_eq!(events[2], ScanEvent::Cancelled);
}

#[test]
fn test_drop_cancels_running_scan() {
    let dir = library_with(50);
    let scanner = LibraryScanner::start(dir.path().to_path_buf());
    scanner.cancel();
    drop(scanner);
}
