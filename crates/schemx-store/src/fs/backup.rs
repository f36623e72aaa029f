use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to a file name to form its backup
pub const BACKUP_SUFFIX: &str = "~";

/// `circuit.xml` → `circuit.xml~`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

pub fn is_backup_path(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(BACKUP_SUFFIX))
        .unwrap_or(false)
}

/// Inverse of `backup_path`; `None` for a path without the suffix
pub fn original_path(backup: &Path) -> Option<PathBuf> {
    let text = backup.to_str()?;
    text.strip_suffix(BACKUP_SUFFIX)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_names() {
        let path = Path::new("/p/schematics/abc.xml");
        let backup = backup_path(path);
        assert_eq!(backup, PathBuf::from("/p/schematics/abc.xml~"));
        assert!(is_backup_path(&backup));
        assert!(!is_backup_path(path));
        assert_eq!(original_path(&backup).unwrap(), path);
        assert_eq!(original_path(path), None);
    }
}
