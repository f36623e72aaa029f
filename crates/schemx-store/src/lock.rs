//! Project lock file
//!
//! A project opened for editing is marked by `.~lock.<file name>#` beside the
//! project file. The lock file holds one line `user,host,pid,timestamp`.
//! A lock left behind by a crashed session of the same user on the same host
//! is reported as stale, which is what triggers crash recovery.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::errors::{io_error_at, Result};
use crate::fs::{atomic_write, remove_if_exists};

const UNKNOWN: &str = "unknown";

/// Who holds a lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOwner {
    pub user: String,
    pub host: String,
    pub pid: u32,
    pub timestamp: DateTime<Utc>,
}

impl LockOwner {
    /// The running process
    pub fn current() -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| UNKNOWN.to_string());
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| UNKNOWN.to_string());
        Self {
            user,
            host,
            pid: std::process::id(),
            timestamp: Utc::now().trunc_subsecs(0),
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.user,
            self.host,
            self.pid,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    /// Parse a lock line; the user name may itself contain commas
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.trim().rsplitn(4, ',');
        let timestamp = fields.next()?.parse::<DateTime<Utc>>().ok()?;
        let pid = fields.next()?.parse::<u32>().ok()?;
        let host = fields.next()?.to_string();
        let user = fields.next()?.to_string();
        Some(Self {
            user,
            host,
            pid,
            timestamp,
        })
    }

    /// Placeholder owner of a lock file whose content cannot be read
    pub fn unreadable(timestamp: DateTime<Utc>) -> Self {
        Self {
            user: UNKNOWN.to_string(),
            host: UNKNOWN.to_string(),
            pid: 0,
            timestamp: timestamp.trunc_subsecs(0),
        }
    }

    fn same_user_and_host(&self, other: &LockOwner) -> bool {
        self.user == other.user && self.host == other.host
    }
}

impl fmt::Display for LockOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} (pid {}, since {})",
            self.user,
            self.host,
            self.pid,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// State of a lock file as seen by the running process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockStatus {
    Unlocked,
    /// Held by another live session
    Locked(LockOwner),
    /// Left behind by a session of this user and host that no longer runs
    StaleLock(LockOwner),
}

#[cfg(target_os = "linux")]
fn process_is_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// Without a portable liveness check a foreign pid counts as alive
#[cfg(not(target_os = "linux"))]
fn process_is_alive(pid: u32) -> bool {
    pid != 0
}

/// `project.scx` → `.~lock.project.scx#`
pub fn lock_path_for(file: &Path) -> PathBuf {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    file.with_file_name(format!(".~lock.{}#", name))
}

/// Lock on one file
#[derive(Debug)]
pub struct FileLock {
    lock_path: PathBuf,
    held: bool,
}

impl FileLock {
    pub fn for_file(file: &Path) -> Self {
        Self {
            lock_path: lock_path_for(file),
            held: false,
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Whether this handle created the lock file
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Resolve the lock state from the lock file
    ///
    /// A lock file that is empty or garbled (a crash while writing it) is
    /// stale, with an `unreadable` owner stamped with the file's mtime.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the lock file cannot be read.
    pub fn status(&self) -> Result<LockStatus> {
        let bytes = match std::fs::read(&self.lock_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(LockStatus::Unlocked),
            Err(e) => return Err(io_error_at("lock_status", &self.lock_path, e)),
        };
        let parsed = std::str::from_utf8(&bytes).ok().and_then(LockOwner::parse);
        let Some(owner) = parsed else {
            let modified = std::fs::metadata(&self.lock_path)
                .and_then(|m| m.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            tracing::warn!(path = %self.lock_path.display(), "unreadable lock file treated as stale");
            return Ok(LockStatus::StaleLock(LockOwner::unreadable(modified)));
        };

        let me = LockOwner::current();
        if !owner.same_user_and_host(&me) {
            return Ok(LockStatus::Locked(owner));
        }
        if owner.pid == me.pid || process_is_alive(owner.pid) {
            return Ok(LockStatus::Locked(owner));
        }
        Ok(LockStatus::StaleLock(owner))
    }

    /// Write the lock file for the running process, replacing a stale one
    ///
    /// # Errors
    ///
    /// Returns `Io` if the lock file cannot be written.
    pub fn lock(&mut self) -> Result<()> {
        let owner = LockOwner::current();
        atomic_write(&self.lock_path, format!("{}\n", owner.to_line()).as_bytes())?;
        self.held = true;
        tracing::debug!(path = %self.lock_path.display(), "lock acquired");
        Ok(())
    }

    /// Remove the lock file if this handle holds it
    ///
    /// # Errors
    ///
    /// Returns `Io` if the lock file cannot be removed.
    pub fn unlock(&mut self) -> Result<()> {
        if !self.held {
            return Ok(());
        }
        remove_if_exists(&self.lock_path)?;
        self.held = false;
        tracing::debug!(path = %self.lock_path.display(), "lock released");
        Ok(())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = self.unlock() {
            tracing::warn!(error = %e, "failed to release lock on drop");
        }
    }
}
