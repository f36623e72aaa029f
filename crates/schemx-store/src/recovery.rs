//! Crash recovery decision
//!
//! When a project is opened over a stale lock, the container asks a
//! `RecoveryPrompt` what to do. The prompt is injected by the caller: an
//! interactive front end asks the user, batch tools use a fixed answer.

use std::path::{Path, PathBuf};

use crate::lock::LockOwner;

/// Answer to a crash recovery prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryChoice {
    /// Load the `~` backup files instead of the saved files
    Restore,
    /// Load the saved files and discard the backups on the next clean close
    Ignore,
    /// Do not open the project
    Cancel,
}

/// Collaborator deciding how to recover from a stale lock
pub trait RecoveryPrompt {
    /// Called once per open when the lock is stale
    ///
    /// # Arguments
    /// * `project_file` - The project being opened
    /// * `owner` - The session that left the lock behind
    /// * `backups` - Backup files found in the project directory (may be empty)
    fn on_stale_lock(
        &mut self,
        project_file: &Path,
        owner: &LockOwner,
        backups: &[PathBuf],
    ) -> RecoveryChoice;
}

/// Prompt that always gives the same answer
///
/// # Example
/// ```
/// use schemx_store::recovery::{FixedRecovery, RecoveryChoice, RecoveryPrompt};
/// use schemx_store::lock::LockOwner;
/// use std::path::Path;
///
/// let mut prompt = FixedRecovery(RecoveryChoice::Ignore);
/// let choice = prompt.on_stale_lock(Path::new("p.scx"), &LockOwner::current(), &[]);
/// assert_eq!(choice, RecoveryChoice::Ignore);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedRecovery(pub RecoveryChoice);

impl RecoveryPrompt for FixedRecovery {
    fn on_stale_lock(&mut self, _: &Path, _: &LockOwner, _: &[PathBuf]) -> RecoveryChoice {
        self.0
    }
}

impl Default for FixedRecovery {
    fn default() -> Self {
        Self(RecoveryChoice::Ignore)
    }
}

/// Restores when backups exist, otherwise ignores
#[derive(Debug, Clone, Copy, Default)]
pub struct RestoreIfAvailable;

impl RecoveryPrompt for RestoreIfAvailable {
    fn on_stale_lock(&mut self, _: &Path, _: &LockOwner, backups: &[PathBuf]) -> RecoveryChoice {
        if backups.is_empty() {
            RecoveryChoice::Ignore
        } else {
            RecoveryChoice::Restore
        }
    }
}
