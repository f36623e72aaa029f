//! Atomic write primitives
//!
//! Uses temp→rename so a reader never observes a partially written file

use crate::errors::{io_error_at, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(target_path.file_name().unwrap_or_default());
    name.push(".tmp");
    target_path.with_file_name(name)
}

/// Atomically replace `target_path` with `content`
///
/// Creates missing parent directories. On failure the previous file content
/// is untouched and no temp file is left behind.
///
/// # Errors
///
/// Returns `Io` with the failing path.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error_at("create_dir", parent, e))?;
    }

    let temp_path = temp_path_for(target_path);
    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error_at("write_temp", &temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error_at("rename_temp", target_path, e));
    }

    Ok(())
}

/// Remove a file, treating "not found" as success
///
/// # Errors
///
/// Returns `Io` for any other failure.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error_at("remove_file", path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("circuit.xml");

        atomic_write(&target, b"<circuit/>").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"<circuit/>");
    }

    #[test]
    fn test_atomic_write_replaces_and_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("core").join("circuit.xml");

        atomic_write(&target, b"old").unwrap();
        atomic_write(&target, b"new").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn test_no_tmp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        atomic_write(&temp_dir.path().join("a.xml"), b"clean").unwrap();

        let tmp_count = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(tmp_count, 0);
    }

    #[test]
    fn test_write_over_directory_fails_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("page.xml");
        fs::create_dir(&target).unwrap();

        let err = atomic_write(&target, b"x").unwrap_err();
        assert_eq!(err.kind(), schemx_core::ExErrorKind::Io);
        assert!(!temp_path_for(&target).exists());
    }

    #[test]
    fn test_remove_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("gone.xml");
        assert!(!remove_if_exists(&target).unwrap());

        fs::write(&target, b"x").unwrap();
        assert!(remove_if_exists(&target).unwrap());
        assert!(!target.exists());
    }
}
