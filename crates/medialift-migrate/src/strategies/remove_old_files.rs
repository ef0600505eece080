// ── Remove-old-files strategy ──
//
// Deletes obsolete cache artifacts left behind by prior app versions.
// Which files count as obsolete is entirely the caller's decision via
// StaleFileMatcher — there is no built-in age threshold or name list.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{info, warn};

use crate::error::MigrateError;
use crate::fs_access::{FileAccess, FileEntry};
use crate::strategy::MigrationStrategy;

/// Predicate identifying obsolete cache files.
///
/// A file matches when its name satisfies at least one name rule (prefix
/// or extension; if no name rules are given, every name passes) *and*
/// its modified time is before the cutoff, when one is set. A matcher
/// with no criteria at all is rejected at strategy construction — it
/// would delete the whole directory.
#[derive(Debug, Clone, Default)]
pub struct StaleFileMatcher {
    name_prefixes: Vec<String>,
    extensions: Vec<String>,
    modified_before: Option<SystemTime>,
}

impl StaleFileMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefixes.push(prefix.into());
        self
    }

    /// Extension without the leading dot (e.g. `"cache"`).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    pub fn with_modified_before(mut self, cutoff: SystemTime) -> Self {
        self.modified_before = Some(cutoff);
        self
    }

    fn is_unconstrained(&self) -> bool {
        self.name_prefixes.is_empty()
            && self.extensions.is_empty()
            && self.modified_before.is_none()
    }

    fn matches(&self, entry: &FileEntry) -> bool {
        if entry.is_dir {
            return false;
        }

        let name_rules = !self.name_prefixes.is_empty() || !self.extensions.is_empty();
        if name_rules {
            let prefix_hit = self
                .name_prefixes
                .iter()
                .any(|p| entry.file_name.starts_with(p.as_str()));
            let ext_hit = self
                .extensions
                .iter()
                .any(|e| entry.path.extension().is_some_and(|x| x == e.as_str()));
            if !prefix_hit && !ext_hit {
                return false;
            }
        }

        if let Some(cutoff) = self.modified_before {
            // Files with unknown mtime are kept; deleting on a guess is
            // worse than leaving a stale file behind.
            return entry.modified.is_some_and(|m| m < cutoff);
        }

        true
    }
}

/// Deletes matching files directly under a root cache directory.
///
/// Individual deletion failures are logged and skipped — a stale file
/// left behind is a cosmetic cost, not a correctness one. Applying twice
/// reaches the same final state as applying once.
pub struct RemoveOldFilesStrategy {
    fs: Arc<dyn FileAccess>,
    root: PathBuf,
    matcher: StaleFileMatcher,
}

impl std::fmt::Debug for RemoveOldFilesStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoveOldFilesStrategy")
            .field("root", &self.root)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl RemoveOldFilesStrategy {
    /// Collaborators are validated here: an empty root or an
    /// unconstrained matcher fails construction, never `apply`.
    pub fn new(
        fs: Arc<dyn FileAccess>,
        root: impl Into<PathBuf>,
        matcher: StaleFileMatcher,
    ) -> Result<Self, MigrateError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(MigrateError::Construction {
                reason: "root cache directory must not be empty".into(),
            });
        }
        if matcher.is_unconstrained() {
            return Err(MigrateError::Construction {
                reason: "stale-file matcher has no criteria; refusing to match everything".into(),
            });
        }
        Ok(Self { fs, root, matcher })
    }

    fn stale_entries(&self) -> Result<Vec<FileEntry>, MigrateError> {
        let entries = match self.fs.list(&self.root) {
            Ok(entries) => entries,
            // A missing cache directory simply means nothing to clean.
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(MigrateError::io(&self.root, err)),
        };
        Ok(entries
            .into_iter()
            .filter(|e| self.matcher.matches(e))
            .collect())
    }
}

impl MigrationStrategy for RemoveOldFilesStrategy {
    fn id(&self) -> &'static str {
        "remove-old-cache-files"
    }

    fn can_apply(&self) -> Result<bool, MigrateError> {
        Ok(!self.stale_entries()?.is_empty())
    }

    fn apply(&self) -> Result<(), MigrateError> {
        let stale = self.stale_entries()?;
        let total = stale.len();
        let mut failed = 0usize;

        for entry in stale {
            if let Err(err) = self.fs.remove(&entry.path) {
                failed += 1;
                warn!(path = %entry.path.display(), %err, "failed to delete stale cache file");
            }
        }

        info!(
            root = %self.root.display(),
            deleted = total - failed,
            failed,
            "removed old cache files"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fs_access::OsFileAccess;
    use std::path::Path;
    use std::time::Duration;

    fn strategy(root: &Path, matcher: StaleFileMatcher) -> RemoveOldFilesStrategy {
        RemoveOldFilesStrategy::new(Arc::new(OsFileAccess), root, matcher).unwrap()
    }

    fn names(root: &Path) -> Vec<String> {
        OsFileAccess
            .list(root)
            .unwrap()
            .into_iter()
            .map(|e| e.file_name)
            .collect()
    }

    #[test]
    fn empty_root_fails_construction() {
        let err = RemoveOldFilesStrategy::new(
            Arc::new(OsFileAccess),
            "",
            StaleFileMatcher::new().with_extension("cache"),
        )
        .unwrap_err();
        assert!(matches!(err, MigrateError::Construction { .. }));
    }

    #[test]
    fn unconstrained_matcher_fails_construction() {
        let err =
            RemoveOldFilesStrategy::new(Arc::new(OsFileAccess), "/tmp", StaleFileMatcher::new())
                .unwrap_err();
        assert!(matches!(err, MigrateError::Construction { .. }));
    }

    #[test]
    fn deletes_only_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("thumb_a.cache"), b"x").unwrap();
        std::fs::write(dir.path().join("upload.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("old_index.cache"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("keepme.cache")).unwrap();

        let s = strategy(dir.path(), StaleFileMatcher::new().with_extension("cache"));
        assert!(s.can_apply().unwrap());
        s.apply().unwrap();

        // Directories never match, even with a matching name.
        assert_eq!(names(dir.path()), vec!["keepme.cache", "upload.jpg"]);
        assert!(!s.can_apply().unwrap());
    }

    #[test]
    fn prefix_rule_matches_independently_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tmp_chunk_0001"), b"x").unwrap();
        std::fs::write(dir.path().join("chunk_0001"), b"x").unwrap();

        let s = strategy(dir.path(), StaleFileMatcher::new().with_name_prefix("tmp_"));
        s.apply().unwrap();
        assert_eq!(names(dir.path()), vec!["chunk_0001"]);
    }

    #[test]
    fn cutoff_spares_recent_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("recent.cache"), b"x").unwrap();

        // Everything in the tempdir was just written; a cutoff in the
        // past matches nothing.
        let cutoff = SystemTime::now() - Duration::from_secs(3600);
        let s = strategy(
            dir.path(),
            StaleFileMatcher::new()
                .with_extension("cache")
                .with_modified_before(cutoff),
        );
        assert!(!s.can_apply().unwrap());
        s.apply().unwrap();
        assert_eq!(names(dir.path()), vec!["recent.cache"]);
    }

    #[test]
    fn applying_twice_reaches_the_same_state() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.cache"), b"x").unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();

        let s = strategy(dir.path(), StaleFileMatcher::new().with_extension("cache"));
        s.apply().unwrap();
        let after_first = names(dir.path());
        s.apply().unwrap();
        assert_eq!(names(dir.path()), after_first);
    }

    #[test]
    fn missing_root_means_nothing_to_do() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");
        let s = strategy(&missing, StaleFileMatcher::new().with_extension("cache"));
        assert!(!s.can_apply().unwrap());
        s.apply().unwrap();
    }

    #[test]
    fn deletion_failures_are_not_fatal() {
        use std::sync::Mutex;

        /// Double that refuses to delete one particular file.
        struct StubbornFs {
            inner: OsFileAccess,
            refuse: String,
            attempts: Mutex<Vec<String>>,
        }

        impl FileAccess for StubbornFs {
            fn list(&self, dir: &Path) -> io::Result<Vec<FileEntry>> {
                self.inner.list(dir)
            }

            fn remove(&self, path: &Path) -> io::Result<()> {
                let name = path.file_name().unwrap().to_string_lossy().into_owned();
                self.attempts
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .push(name.clone());
                if name == self.refuse {
                    return Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"));
                }
                self.inner.remove(path)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.cache"), b"x").unwrap();
        std::fs::write(dir.path().join("b.cache"), b"x").unwrap();
        std::fs::write(dir.path().join("c.cache"), b"x").unwrap();

        let fs = Arc::new(StubbornFs {
            inner: OsFileAccess,
            refuse: "b.cache".into(),
            attempts: Mutex::new(Vec::new()),
        });
        let s = RemoveOldFilesStrategy::new(
            Arc::clone(&fs) as Arc<dyn FileAccess>,
            dir.path(),
            StaleFileMatcher::new().with_extension("cache"),
        )
        .unwrap();

        // Partial success: the locked file stays, apply still reports Ok.
        s.apply().unwrap();
        assert_eq!(names(dir.path()), vec!["b.cache"]);

        // All three were attempted — one failure didn't stop the sweep.
        let attempts = fs
            .attempts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        assert_eq!(attempts, vec!["a.cache", "b.cache", "c.cache"]);
    }
}
