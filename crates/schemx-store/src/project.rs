//! Project container
//!
//! A `Project` owns the document of one open project together with the lock
//! on its project file. Loading reads the project file, the circuit file and
//! every page file; saving writes them back.
//!
//! Saving happens in two phases. First every file is written to its `~`
//! backup; if any backup fails nothing else is touched. Then every original
//! is replaced atomically, continuing past failures so that as many files as
//! possible are saved, and all failures are reported together.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use schemx_core::{
    log_op_end, log_op_error, log_op_start, CircuitGraph, Document, ExError, ExErrorKind,
};
use schemx_core_types::EntityId;
use walkdir::WalkDir;

use crate::errors::{
    already_locked, cancelled, invalid_project_content, invalid_project_file, io_error_at,
    save_failed, Result,
};
use crate::format::{
    circuit, project_file, schematic, schematic_file, ProjectMeta, CIRCUIT_FILE,
    PROJECT_FILE_EXTENSION, SCHEMATICS_DIR,
};
use crate::fs::{atomic_write, backup_path, is_backup_path, remove_if_exists};
use crate::lock::{FileLock, LockStatus};
use crate::recovery::{RecoveryChoice, RecoveryPrompt};
use crate::xml::XmlTree;

/// An open project
#[derive(Debug)]
pub struct Project {
    file: PathBuf,
    directory: PathBuf,
    meta: ProjectMeta,
    document: Document,
    lock: FileLock,
    page_files: BTreeSet<String>,
    restored: bool,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn check_project_file_name(file: &Path) -> Result<()> {
    let is_project = file
        .extension()
        .map(|ext| ext == PROJECT_FILE_EXTENSION)
        .unwrap_or(false);
    if is_project {
        Ok(())
    } else {
        Err(invalid_project_file(
            file,
            format!("not a *.{} file", PROJECT_FILE_EXTENSION),
        ))
    }
}

fn project_directory(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Read `path`, or its backup when restoring and a backup exists
fn read_source(path: &Path, restore: bool) -> Result<(PathBuf, Vec<u8>)> {
    let source = if restore && backup_path(path).is_file() {
        backup_path(path)
    } else {
        path.to_path_buf()
    };
    let bytes = fs::read(&source).map_err(|e| io_error_at("project_load", &source, e))?;
    Ok((source, bytes))
}

/// Page files present in the schematics directory, as project-relative paths
///
/// Unreadable entries are skipped; the result only feeds orphan pruning.
fn page_files_on_disk(directory: &Path) -> BTreeSet<String> {
    let pages = directory.join(SCHEMATICS_DIR);
    if !pages.is_dir() {
        return BTreeSet::new();
    }
    WalkDir::new(pages)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().map(|ext| ext == "xml").unwrap_or(false))
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| format!("{}/{}", SCHEMATICS_DIR, name))
        })
        .collect()
}

/// Backup files below `directory`, sorted
fn backups_in(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut backups = Vec::new();
    for entry in WalkDir::new(directory).max_depth(3) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(directory).to_path_buf();
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
            io_error_at("list_backups", &path, io)
        })?;
        if entry.file_type().is_file() && is_backup_path(entry.path()) {
            backups.push(entry.into_path());
        }
    }
    backups.sort();
    Ok(backups)
}

fn load_graph(
    directory: &Path,
    file: &Path,
    restore: bool,
) -> Result<(ProjectMeta, CircuitGraph, BTreeSet<String>)> {
    let mut graph = CircuitGraph::new();

    let (source, bytes) = read_source(file, restore)?;
    let (meta, entries) = XmlTree::parse_with_root(&bytes, project_file::ROOT)
        .and_then(|tree| project_file::read(&tree, &mut graph))
        .map_err(|e| invalid_project_content(&source, e))?;

    let (source, bytes) = read_source(&directory.join(CIRCUIT_FILE), restore)?;
    XmlTree::parse_with_root(&bytes, circuit::ROOT)
        .and_then(|tree| circuit::read(&tree, &mut graph))
        .map_err(|e| invalid_project_content(&source, e))?;

    let mut page_files = BTreeSet::new();
    for entry in entries {
        let (source, bytes) = read_source(&directory.join(&entry.file), restore)?;
        let id = XmlTree::parse_with_root(&bytes, schematic::ROOT)
            .and_then(|tree| schematic::read(&tree, &mut graph))
            .map_err(|e| invalid_project_content(&source, e))?;
        if id != entry.id {
            return Err(invalid_project_file(
                &source,
                format!("page id {} does not match the project entry {}", id, entry.id),
            ));
        }
        page_files.insert(entry.file);
    }

    graph
        .ensure_default_net_class()
        .map_err(|e| invalid_project_content(file, e.into()))?;
    Ok((meta, graph, page_files))
}

impl Project {
    /// Create a new project with the default net class and save it
    ///
    /// # Errors
    ///
    /// * `InvalidProjectFile` - Wrong file extension or empty name
    /// * `Io` - The file exists already or cannot be written
    /// * `AlreadyLocked` - Another session holds a lock on the path
    pub fn create(file: &Path, name: &str) -> Result<Self> {
        check_project_file_name(file)?;
        if name.trim().is_empty() {
            return Err(invalid_project_file(file, "project name must not be empty"));
        }
        if file.exists() {
            return Err(io_error_at(
                "project_create",
                file,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "file exists"),
            ));
        }

        let directory = project_directory(file);
        fs::create_dir_all(&directory).map_err(|e| io_error_at("project_create", &directory, e))?;

        let mut lock = FileLock::for_file(file);
        if let LockStatus::Locked(owner) = lock.status()? {
            return Err(already_locked(file, owner));
        }
        lock.lock()?;

        let mut project = Self {
            file: file.to_path_buf(),
            directory,
            meta: ProjectMeta::new(name.trim()),
            document: Document::new(CircuitGraph::with_default_net_class()),
            lock,
            page_files: BTreeSet::new(),
            restored: false,
        };
        project.save()?;
        tracing::info!(path = %file.display(), "project created");
        Ok(project)
    }

    /// Open an existing project and lock it
    ///
    /// A stale lock (left by a crashed session of this user on this host)
    /// is reported to `recovery`, which decides whether the `~` backups are
    /// loaded instead of the saved files.
    ///
    /// # Errors
    ///
    /// * `InvalidProjectFile` - Not a project file, or its content is invalid
    /// * `AlreadyLocked` - Another live session has the project open
    /// * `Cancelled` - `recovery` chose to cancel
    /// * `Io` - A file cannot be read or the lock cannot be written
    pub fn open(file: &Path, recovery: &mut dyn RecoveryPrompt) -> Result<Self> {
        log_op_start!("project_open", path = %file.display());
        let start = Instant::now();

        match Self::open_locked(file, recovery) {
            Ok(project) => {
                log_op_end!(
                    "project_open",
                    duration_ms = elapsed_ms(start),
                    path = %file.display(),
                    restored = project.restored,
                    entity_count = project.graph().entity_count()
                );
                Ok(project)
            }
            Err(e) => {
                log_op_error!("project_open", e.clone(), duration_ms = elapsed_ms(start));
                Err(e)
            }
        }
    }

    fn open_locked(file: &Path, recovery: &mut dyn RecoveryPrompt) -> Result<Self> {
        check_project_file_name(file)?;
        if !file.is_file() {
            return Err(invalid_project_file(file, "file does not exist"));
        }
        let directory = project_directory(file);

        let mut lock = FileLock::for_file(file);
        let restore = match lock.status()? {
            LockStatus::Unlocked => false,
            LockStatus::Locked(owner) => return Err(already_locked(file, owner)),
            LockStatus::StaleLock(owner) => {
                let backups = backups_in(&directory)?;
                tracing::warn!(
                    path = %file.display(),
                    owner = %owner,
                    backups = backups.len(),
                    "stale lock found"
                );
                match recovery.on_stale_lock(file, &owner, &backups) {
                    RecoveryChoice::Restore => true,
                    RecoveryChoice::Ignore => false,
                    RecoveryChoice::Cancel => return Err(cancelled("project_open")),
                }
            }
        };
        lock.lock()?;

        let (meta, graph, page_files) = load_graph(&directory, file, restore)?;
        let mut document = Document::new(graph);
        document.set_clean();

        Ok(Self {
            file: file.to_path_buf(),
            directory,
            meta,
            document,
            lock,
            page_files,
            restored: restore,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn meta(&self) -> &ProjectMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn graph(&self) -> &CircuitGraph {
        self.document.graph()
    }

    /// Absolute path of the file of page `id`
    pub fn schematic_path(&self, id: EntityId) -> PathBuf {
        self.directory.join(schematic_file(id))
    }

    /// Whether the document differs from the saved files
    ///
    /// A project restored from backups counts as modified until saved.
    pub fn has_unsaved_changes(&self) -> bool {
        self.restored || !self.document.is_clean()
    }

    fn ensure_no_active_command(&self, op: &str) -> Result<()> {
        if self.document.undo_stack().is_command_active() {
            return Err(ExError::new(ExErrorKind::CommandAlreadyActive)
                .with_op(op)
                .with_message("a command is still active"));
        }
        Ok(())
    }

    /// Serialize every project file, paths absolute
    fn render_files(&self) -> Result<Vec<(PathBuf, Vec<u8>)>> {
        let graph = self.graph();
        let mut files = vec![
            (self.file.clone(), project_file::write(&self.meta, graph)?.serialize()?),
            (self.directory.join(CIRCUIT_FILE), circuit::write(graph)?.serialize()?),
        ];
        for page in graph.schematics() {
            files.push((self.schematic_path(page.id), schematic::write(page)?.serialize()?));
        }
        Ok(files)
    }

    fn current_page_files(&self) -> BTreeSet<String> {
        self.graph().schematics().map(|s| schematic_file(s.id)).collect()
    }

    /// Save the project to its files
    ///
    /// Page files no page refers to any more are deleted, together with
    /// their backups. On success the document is marked clean.
    ///
    /// # Errors
    ///
    /// * `CommandAlreadyActive` - A command is open on the document
    /// * `SaveFailed` - One or more files could not be written; carries
    ///   every failure
    pub fn save(&mut self) -> Result<()> {
        log_op_start!("project_save", path = %self.file.display());
        let start = Instant::now();

        let result = self.save_files();
        match &result {
            Ok(count) => {
                log_op_end!(
                    "project_save",
                    duration_ms = elapsed_ms(start),
                    path = %self.file.display(),
                    file_count = *count
                );
            }
            Err(e) => {
                log_op_error!("project_save", e.clone(), duration_ms = elapsed_ms(start));
            }
        }
        result.map(|_| ())
    }

    fn save_files(&mut self) -> Result<usize> {
        self.ensure_no_active_command("project_save")?;
        let files = self.render_files()?;

        let failures: Vec<ExError> = files
            .iter()
            .filter_map(|(path, bytes)| atomic_write(&backup_path(path), bytes).err())
            .collect();
        if !failures.is_empty() {
            return Err(save_failed(failures));
        }

        let mut failures: Vec<ExError> = files
            .iter()
            .filter_map(|(path, bytes)| atomic_write(path, bytes).err())
            .collect();

        let current = self.current_page_files();
        // pages dropped by a restored session are only known from the disk
        let known: BTreeSet<String> = self
            .page_files
            .union(&page_files_on_disk(&self.directory))
            .cloned()
            .collect();
        let mut kept = BTreeSet::new();
        for orphan in known.difference(&current) {
            let path = self.directory.join(orphan);
            let removed = remove_if_exists(&path).and_then(|_| remove_if_exists(&backup_path(&path)));
            if let Err(e) = removed {
                kept.insert(orphan.clone());
                failures.push(e);
            }
        }

        if !failures.is_empty() {
            self.page_files = current.union(&kept).cloned().collect();
            return Err(save_failed(failures));
        }

        self.page_files = current;
        self.document.set_clean();
        self.restored = false;
        Ok(files.len())
    }

    /// Write the `~` backup of every project file (autosave)
    ///
    /// The saved files and the clean state are left untouched. Returns the
    /// number of backups written.
    ///
    /// # Errors
    ///
    /// * `CommandAlreadyActive` - A command is open on the document
    /// * `SaveFailed` - One or more backups could not be written
    pub fn write_backup(&self) -> Result<usize> {
        log_op_start!("project_autosave", path = %self.file.display());
        let start = Instant::now();

        let result = self.ensure_no_active_command("project_autosave").and_then(|_| {
            let files = self.render_files()?;
            let failures: Vec<ExError> = files
                .iter()
                .filter_map(|(path, bytes)| atomic_write(&backup_path(path), bytes).err())
                .collect();
            if failures.is_empty() {
                Ok(files.len())
            } else {
                Err(save_failed(failures))
            }
        });

        match &result {
            Ok(count) => {
                log_op_end!(
                    "project_autosave",
                    duration_ms = elapsed_ms(start),
                    file_count = *count
                );
            }
            Err(e) => {
                log_op_error!("project_autosave", e.clone(), duration_ms = elapsed_ms(start));
            }
        }
        result
    }

    /// Backup files currently present in the project directory
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory cannot be listed.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>> {
        backups_in(&self.directory)
    }

    /// Close the project: remove the backups and release the lock
    ///
    /// Unsaved changes are discarded.
    ///
    /// # Errors
    ///
    /// Returns `Io` if a backup or the lock file cannot be removed.
    pub fn close(mut self) -> Result<()> {
        if self.has_unsaved_changes() {
            tracing::warn!(path = %self.file.display(), "closing project with unsaved changes");
        }
        for backup in self.list_backups()? {
            remove_if_exists(&backup)?;
        }
        self.lock.unlock()?;
        tracing::info!(path = %self.file.display(), "project closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::FixedRecovery;
    use schemx_core::Command;
    use schemx_core::model::NetClass;
    use tempfile::TempDir;

    #[test]
    fn test_create_writes_all_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("amp").join("amp.scx");

        let project = Project::create(&file, "Amplifier").unwrap();

        assert!(file.is_file());
        assert!(dir.path().join("amp/core/circuit.xml").is_file());
        assert!(project.graph().net_class_by_name("default").is_some());
        assert!(!project.has_unsaved_changes());
        project.close().unwrap();
    }

    #[test]
    fn test_create_rejects_wrong_extension_and_existing_file() {
        let dir = TempDir::new().unwrap();
        let err = Project::create(&dir.path().join("amp.txt"), "Amp").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidProjectFile);

        let file = dir.path().join("amp.scx");
        fs::write(&file, b"").unwrap();
        let err = Project::create(&file, "Amp").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
    }

    #[test]
    fn test_edit_marks_dirty_and_save_cleans() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::create(&dir.path().join("p.scx"), "P").unwrap();

        project
            .document_mut()
            .execute(Command::add_net_class(NetClass::new(EntityId::new(), "power")))
            .unwrap();
        assert!(project.has_unsaved_changes());

        project.save().unwrap();
        assert!(!project.has_unsaved_changes());
    }

    #[test]
    fn test_write_backup_leaves_originals() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("p.scx");
        let mut project = Project::create(&file, "P").unwrap();
        let saved = fs::read(dir.path().join(CIRCUIT_FILE)).unwrap();

        project
            .document_mut()
            .execute(Command::add_net_class(NetClass::new(EntityId::new(), "power")))
            .unwrap();
        project.write_backup().unwrap();

        assert_eq!(fs::read(dir.path().join(CIRCUIT_FILE)).unwrap(), saved);
        let backup = fs::read_to_string(backup_path(&dir.path().join(CIRCUIT_FILE))).unwrap();
        assert!(backup.contains("power"));
        assert!(project.has_unsaved_changes());
    }

    #[test]
    fn test_close_removes_backups_and_lock() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("p.scx");
        let project = Project::create(&file, "P").unwrap();
        assert!(!project.list_backups().unwrap().is_empty());

        project.close().unwrap();

        assert!(backups_in(dir.path()).unwrap().is_empty());
        assert!(!crate::lock::lock_path_for(&file).exists());
    }

    #[test]
    fn test_open_nonexistent_is_invalid() {
        let dir = TempDir::new().unwrap();
        let err = Project::open(&dir.path().join("none.scx"), &mut FixedRecovery::default())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidProjectFile);
    }
}
