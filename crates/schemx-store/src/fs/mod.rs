//! Filesystem primitives: atomic replacement and backup file naming

mod atomic;
mod backup;

pub use atomic::{atomic_write, remove_if_exists};
pub use backup::{backup_path, is_backup_path, original_path, BACKUP_SUFFIX};
