// ── File-system access boundary ──
//
// Strategies never touch `std::fs` directly; they receive a FileAccess
// so tests can substitute a double and observe or fail individual
// operations.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One directory entry as seen by a migration strategy.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub file_name: String,
    /// Last-modified time, if the platform reports one.
    pub modified: Option<SystemTime>,
    pub is_dir: bool,
}

/// The two file-system capabilities migrations need: enumerate a
/// directory and delete an entry. Nothing recursive, nothing global.
pub trait FileAccess: Send + Sync {
    /// List the immediate entries under `dir`.
    fn list(&self, dir: &Path) -> io::Result<Vec<FileEntry>>;

    /// Delete a single entry (file or directory tree).
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Production implementation backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileAccess;

impl FileAccess for OsFileAccess {
    fn list(&self, dir: &Path) -> io::Result<Vec<FileEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            entries.push(FileEntry {
                path: entry.path(),
                file_name: entry.file_name().to_string_lossy().into_owned(),
                modified: metadata.modified().ok(),
                is_dir: metadata.is_dir(),
            });
        }
        // Deterministic order keeps runs reproducible across platforms.
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if path.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn list_reports_files_and_dirs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.tmp"), b"x").unwrap();
        std::fs::write(dir.path().join("a.tmp"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let entries = OsFileAccess.list(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.tmp", "b.tmp", "sub"]);
        assert!(entries[2].is_dir);
        assert!(entries[0].modified.is_some());
    }

    #[test]
    fn remove_handles_files_and_dir_trees() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gone.tmp");
        std::fs::write(&file, b"x").unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("inner"), b"x").unwrap();

        OsFileAccess.remove(&file).unwrap();
        OsFileAccess.remove(&sub).unwrap();
        assert!(OsFileAccess.list(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn list_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(OsFileAccess.list(&missing).is_err());
    }
}
