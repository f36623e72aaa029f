//! SchemX Store - persistence of SchemX projects
//!
//! This crate provides:
//! - An arena XML tree with quick-xml parsing and serialization
//! - The entity ↔ node mapping of project, circuit and page files
//! - Atomic file replacement and `~` backup files
//! - Project lock files with stale-lock detection and crash recovery
//! - The project container (create, open, save, autosave, close)
//! - Workspace directories with TOML settings
//! - A background library scanner

pub mod errors;
pub mod format;
pub mod fs;
pub mod lock;
pub mod project;
pub mod recovery;
pub mod scanner;
pub mod workspace;
pub mod xml;

pub use errors::Result;
pub use lock::{FileLock, LockOwner, LockStatus};
pub use project::Project;
pub use recovery::{FixedRecovery, RecoveryChoice, RecoveryPrompt, RestoreIfAvailable};
pub use scanner::{LibraryEntry, LibraryScanner, ScanEvent};
pub use workspace::{Workspace, WorkspaceSettings};
pub use xml::{NodeId, XmlTree};
