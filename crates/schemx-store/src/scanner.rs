//! Library scanner
//!
//! Indexes the library directory on a background thread. Every `*.xml` file
//! below the directory is read as a library element; its root element name
//! gives the element kind and its `uuid`/`name` attributes identify it.
//! The scanner only reads files and never touches an open document.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;

use schemx_core_types::EntityId;
use walkdir::WalkDir;

use crate::xml::XmlTree;

const ELEMENT_EXTENSION: &str = "xml";

/// One indexed library element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub path: PathBuf,
    /// Root element name, e.g. `component` or `symbol`
    pub kind: String,
    pub id: Option<EntityId>,
    pub name: Option<String>,
}

/// Progress report of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Progress { done: usize, total: usize },
    Finished { entries: Vec<LibraryEntry>, skipped: usize },
    Cancelled,
    Failed(String),
}

impl ScanEvent {
    /// Whether no further event follows
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScanEvent::Progress { .. })
    }
}

fn collect_candidates(root: &Path) -> Result<Vec<PathBuf>, String> {
    if !root.is_dir() {
        return Err(format!("{} is not a directory", root.display()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| e.to_string())?;
        let is_element = entry
            .path()
            .extension()
            .map(|ext| ext == ELEMENT_EXTENSION)
            .unwrap_or(false);
        if entry.file_type().is_file() && is_element {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read_entry(path: &Path) -> Option<LibraryEntry> {
    let bytes = std::fs::read(path).ok()?;
    let tree = XmlTree::parse(&bytes).ok()?;
    let root = tree.root();
    Some(LibraryEntry {
        path: path.to_path_buf(),
        kind: tree.name(root).to_string(),
        id: tree.attribute(root, "uuid").and_then(|v| v.parse().ok()),
        name: tree.attribute(root, "name").map(str::to_string),
    })
}

/// Scan `root` on the calling thread
///
/// Emits one `Progress` per file and a terminal event. `cancel` is checked
/// before every file.
pub fn scan(root: &Path, cancel: &AtomicBool, mut on_event: impl FnMut(ScanEvent)) {
    let files = match collect_candidates(root) {
        Ok(files) => files,
        Err(message) => {
            tracing::warn!(path = %root.display(), error = %message, "library scan failed");
            on_event(ScanEvent::Failed(message));
            return;
        }
    };

    let total = files.len();
    let mut entries = Vec::with_capacity(total);
    let mut skipped = 0;
    for (index, file) in files.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!(done = index, total, "library scan cancelled");
            on_event(ScanEvent::Cancelled);
            return;
        }
        match read_entry(file) {
            Some(entry) => entries.push(entry),
            None => {
                tracing::warn!(path = %file.display(), "skipping unreadable library element");
                skipped += 1;
            }
        }
        on_event(ScanEvent::Progress {
            done: index + 1,
            total,
        });
    }

    tracing::info!(path = %root.display(), elements = entries.len(), skipped, "library scan finished");
    on_event(ScanEvent::Finished { entries, skipped });
}

/// Background library scan
///
/// Dropping the scanner cancels the scan and joins the worker.
#[derive(Debug)]
pub struct LibraryScanner {
    cancel: Arc<AtomicBool>,
    events: Receiver<ScanEvent>,
    handle: Option<JoinHandle<()>>,
}

impl LibraryScanner {
    /// Start scanning `root` on a new thread
    pub fn start(root: PathBuf) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let (sender, events) = mpsc::channel();
        let flag = Arc::clone(&cancel);
        let handle = std::thread::spawn(move || {
            scan(&root, &flag, |event| {
                // the receiver may be gone; the scan then runs to the next cancel check
                let _ = sender.send(event);
            });
        });
        Self {
            cancel,
            events,
            handle: Some(handle),
        }
    }

    /// Request cancellation; takes effect before the next file
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn events(&self) -> &Receiver<ScanEvent> {
        &self.events
    }

    /// Block until the scan ends and return every event not yet received
    pub fn wait(mut self) -> Vec<ScanEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.recv() {
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                break;
            }
        }
        self.join();
        events
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("library scanner thread panicked");
            }
        }
    }
}

impl Drop for LibraryScanner {
    fn drop(&mut self) {
        self.cancel();
        self.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_element(dir: &Path, file: &str, xml: &str) {
        let path = dir.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, xml).unwrap();
    }

    #[test]
    fn test_scan_reads_elements_and_skips_broken_files() {
        let dir = TempDir::new().unwrap();
        let id = EntityId::new();
        write_element(
            dir.path(),
            "cmp/resistor.xml",
            &format!(r#"<component uuid="{}" name="Resistor"/>"#, id),
        );
        write_element(dir.path(), "sym/broken.xml", "<symbol>");
        write_element(dir.path(), "readme.txt", "not an element");

        let mut events = Vec::new();
        scan(dir.path(), &AtomicBool::new(false), |e| events.push(e));

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], ScanEvent::Progress { done: 1, total: 2 });
        match &events[2] {
            ScanEvent::Finished { entries, skipped } => {
                assert_eq!(*skipped, 1);
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].kind, "component");
                assert_eq!(entries[0].id, Some(id));
                assert_eq!(entries[0].name.as_deref(), Some("Resistor"));
            }
            other => panic!("expected Finished, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut events = Vec::new();
        scan(&dir.path().join("missing"), &AtomicBool::new(false), |e| events.push(e));
        assert!(matches!(events.as_slice(), [ScanEvent::Failed(_)]));
    }
}
