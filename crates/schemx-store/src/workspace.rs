//! Workspace directory and settings
//!
//! A workspace is a directory with a `.metadata` subdirectory. Settings live
//! in `.metadata/workspace.toml`; projects are kept below `projects/` and
//! library elements below the library directory (`lib/` by default).

use std::path::{Path, PathBuf};

use schemx_core::RedoValidation;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::errors::{
    already_locked, invalid_project_file, invalid_workspace, io_error_at, serialization_error,
    Result,
};
use crate::format::PROJECT_FILE_EXTENSION;
use crate::fs::atomic_write;
use crate::lock::{FileLock, LockStatus};
use crate::project::Project;
use crate::recovery::RecoveryPrompt;

pub const METADATA_DIR: &str = ".metadata";
pub const SETTINGS_FILE: &str = "workspace.toml";
pub const PROJECTS_DIR: &str = "projects";

/// Settings version this build reads and writes
pub const SETTINGS_VERSION: u32 = 1;

/// Per-workspace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    pub version: u32,

    /// Interval for the external autosave scheduler; 0 disables autosave
    pub autosave_interval_secs: u64,

    /// Redo behavior of documents opened from this workspace
    pub redo_validation: RedoValidation,

    /// Library directory, relative to the workspace root
    pub library_dir: PathBuf,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            autosave_interval_secs: 600,
            redo_validation: RedoValidation::default(),
            library_dir: PathBuf::from("lib"),
        }
    }
}

impl WorkspaceSettings {
    /// Parse settings; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns `InvalidWorkspace` for malformed TOML or an unknown version.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).map_err(|e| invalid_workspace(path, e))?;
        if settings.version != SETTINGS_VERSION {
            return Err(invalid_workspace(
                path,
                format!("unsupported settings version {}", settings.version),
            ));
        }
        if settings.library_dir.is_absolute() {
            return Err(invalid_workspace(path, "library_dir must be relative"));
        }
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns `Serialization` if the settings cannot be encoded.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| serialization_error("workspace_settings", e))
    }
}

/// An open workspace, locked for this process
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    settings: WorkspaceSettings,
    lock: FileLock,
}

impl Workspace {
    /// Whether `path` is an existing workspace directory
    pub fn is_valid_path(path: &Path) -> bool {
        path.is_dir() && path.join(METADATA_DIR).is_dir()
    }

    /// Create a workspace at `path` (if needed) and open it
    ///
    /// Creates `.metadata` with default settings; an existing workspace is
    /// opened unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWorkspace` if `path` exists but is not a directory,
    /// `Io` if the directories or settings cannot be written, and the errors
    /// of `open`.
    pub fn init(path: &Path) -> Result<Self> {
        if path.exists() && !path.is_dir() {
            return Err(invalid_workspace(path, "not a directory"));
        }
        if !Self::is_valid_path(path) {
            let metadata = path.join(METADATA_DIR);
            std::fs::create_dir_all(&metadata)
                .map_err(|e| io_error_at("workspace_init", &metadata, e))?;
            let settings = WorkspaceSettings::default();
            atomic_write(&metadata.join(SETTINGS_FILE), settings.to_toml()?.as_bytes())?;
            tracing::info!(path = %path.display(), "workspace created");
        }
        Self::open(path)
    }

    /// Open and lock an existing workspace
    ///
    /// Creates the projects and library directories if missing. A stale
    /// workspace lock is taken over, since a workspace holds nothing to
    /// recover.
    ///
    /// # Errors
    ///
    /// * `InvalidWorkspace` - Not a workspace, or invalid settings
    /// * `AlreadyLocked` - Another live session uses the workspace
    /// * `Io` - Directories or the lock cannot be written
    pub fn open(path: &Path) -> Result<Self> {
        if !Self::is_valid_path(path) {
            return Err(invalid_workspace(path, "not a workspace directory"));
        }

        let settings_path = path.join(METADATA_DIR).join(SETTINGS_FILE);
        let settings = match std::fs::read_to_string(&settings_path) {
            Ok(text) => WorkspaceSettings::from_toml(&settings_path, &text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => WorkspaceSettings::default(),
            Err(e) => return Err(io_error_at("workspace_open", &settings_path, e)),
        };

        let mut lock = FileLock::for_file(&path.join("workspace"));
        match lock.status()? {
            LockStatus::Unlocked => {}
            LockStatus::Locked(owner) => return Err(already_locked(path, owner)),
            LockStatus::StaleLock(owner) => {
                tracing::warn!(path = %path.display(), owner = %owner, "taking over stale workspace lock");
            }
        }
        lock.lock()?;

        let workspace = Self {
            root: path.to_path_buf(),
            settings,
            lock,
        };
        for dir in [workspace.projects_dir(), workspace.library_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| io_error_at("workspace_open", &dir, e))?;
        }
        tracing::debug!(path = %path.display(), "workspace opened");
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &WorkspaceSettings {
        &self.settings
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join(PROJECTS_DIR)
    }

    pub fn library_dir(&self) -> PathBuf {
        self.root.join(&self.settings.library_dir)
    }

    /// Replace and persist the settings
    ///
    /// # Errors
    ///
    /// Returns `InvalidWorkspace` for settings this build would not read
    /// back, `Io` if the file cannot be written.
    pub fn save_settings(&mut self, settings: WorkspaceSettings) -> Result<()> {
        let path = self.metadata_dir().join(SETTINGS_FILE);
        let text = settings.to_toml()?;
        WorkspaceSettings::from_toml(&path, &text)?;
        atomic_write(&path, text.as_bytes())?;
        self.settings = settings;
        Ok(())
    }

    /// Project files below the projects directory, sorted
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory cannot be listed.
    pub fn project_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(self.projects_dir()).min_depth(1).max_depth(3) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.projects_dir());
                let io = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
                io_error_at("workspace_projects", &path, io)
            })?;
            let is_project = entry
                .path()
                .extension()
                .map(|ext| ext == PROJECT_FILE_EXTENSION)
                .unwrap_or(false);
            if entry.file_type().is_file() && is_project {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Create `projects/<name>/<name>.scx`
    ///
    /// # Errors
    ///
    /// Returns `InvalidProjectFile` for a name that is not a plain file
    /// name, and the errors of `Project::create`.
    pub fn create_project(&self, name: &str) -> Result<Project> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        let file = self
            .projects_dir()
            .join(name)
            .join(format!("{}.{}", name, PROJECT_FILE_EXTENSION));
        if !plain {
            return Err(invalid_project_file(&file, "project name is not a plain file name"));
        }
        let mut project = Project::create(&file, name)?;
        project
            .document_mut()
            .set_redo_validation(self.settings.redo_validation);
        Ok(project)
    }

    /// Open a project with this workspace's redo behavior
    ///
    /// # Errors
    ///
    /// The errors of `Project::open`.
    pub fn open_project(&self, file: &Path, recovery: &mut dyn RecoveryPrompt) -> Result<Project> {
        let mut project = Project::open(file, recovery)?;
        project
            .document_mut()
            .set_redo_validation(self.settings.redo_validation);
        Ok(project)
    }

    /// Release the workspace lock
    ///
    /// # Errors
    ///
    /// Returns `Io` if the lock file cannot be removed.
    pub fn close(mut self) -> Result<()> {
        self.lock.unlock()
    }
}
