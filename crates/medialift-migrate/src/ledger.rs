// ── Migration ledger ──
//
// Persisted record of which strategy identifiers have already run, plus
// the settings-schema version tag. Recording is write-through: each
// applied id is flushed to disk immediately (temp file + rename), so a
// crash after one strategy never re-runs it on the next launch.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MigrateError;

/// Version tag assumed when no ledger exists yet. An install without a
/// ledger predates schema versioning, so it is treated as legacy until a
/// strategy establishes otherwise; fresh installs just skip the schema
/// strategies (their `can_apply` finds nothing to migrate).
pub const LEGACY_SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct LedgerState {
    /// Settings-schema version this install has been migrated to.
    #[serde(default = "legacy_settings_version")]
    settings_version: u32,

    /// Applied strategy id → when it ran.
    #[serde(default)]
    applied: BTreeMap<String, DateTime<Utc>>,
}

fn legacy_settings_version() -> u32 {
    LEGACY_SETTINGS_VERSION
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            settings_version: LEGACY_SETTINGS_VERSION,
            applied: BTreeMap::new(),
        }
    }
}

/// The persisted applied-set.
///
/// Loading is fail-soft (a malformed ledger is treated as empty, which
/// only costs re-running idempotent strategies); recording an id is
/// write-through and surfaces failures, since losing an applied mark is
/// what causes double-runs.
#[derive(Debug)]
pub struct MigrationLedger {
    path: PathBuf,
    state: LedgerState,
}

impl MigrationLedger {
    /// Load the ledger from `path`, or start empty if missing/malformed.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(state) => state,
                Err(err) => {
                    warn!(path = %path.display(), %err, "malformed migration ledger, starting empty");
                    LedgerState::default()
                }
            },
            Err(err) => {
                debug!(path = %path.display(), %err, "no migration ledger yet");
                LedgerState::default()
            }
        };
        Self { path, state }
    }

    pub fn is_applied(&self, id: &str) -> bool {
        self.state.applied.contains_key(id)
    }

    pub fn applied_ids(&self) -> Vec<&str> {
        self.state.applied.keys().map(String::as_str).collect()
    }

    pub fn applied_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.state.applied.get(id).copied()
    }

    pub fn settings_version(&self) -> u32 {
        self.state.settings_version
    }

    /// Mark a strategy as applied and flush to disk immediately.
    pub fn record(&mut self, id: &str) -> Result<(), MigrateError> {
        self.state.applied.insert(id.to_owned(), Utc::now());
        self.save()
    }

    /// Update the settings-schema version tag and flush.
    pub fn set_settings_version(&mut self, version: u32) -> Result<(), MigrateError> {
        self.state.settings_version = version;
        self.save()
    }

    /// Atomic write: temp file in the ledger's directory, flush, rename.
    fn save(&self) -> Result<(), MigrateError> {
        let parent = self.path.parent().ok_or_else(|| MigrateError::Construction {
            reason: format!("ledger path has no parent directory: {}", self.path.display()),
        })?;
        std::fs::create_dir_all(parent).map_err(|e| MigrateError::io(parent, e))?;

        let text = toml::to_string_pretty(&self.state)?;
        let mut tmp =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| MigrateError::io(parent, e))?;
        tmp.write_all(text.as_bytes())
            .map_err(|e| MigrateError::io(&self.path, e))?;
        tmp.flush().map_err(|e| MigrateError::io(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| MigrateError::io(&self.path, e.error))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_ledger_has_nothing_applied() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = MigrationLedger::load(dir.path().join("migrations.toml"));
        assert!(!ledger.is_applied("anything"));
        assert_eq!(ledger.settings_version(), LEGACY_SETTINGS_VERSION);
    }

    #[test]
    fn record_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migrations.toml");

        let mut ledger = MigrationLedger::load(&path);
        ledger.record("remove-old-cache-files").unwrap();
        assert!(ledger.is_applied("remove-old-cache-files"));

        // Simulated restart: fresh load from the same path.
        let reloaded = MigrationLedger::load(&path);
        assert!(reloaded.is_applied("remove-old-cache-files"));
        assert!(reloaded.applied_at("remove-old-cache-files").is_some());
        assert_eq!(reloaded.applied_ids(), vec!["remove-old-cache-files"]);
    }

    #[test]
    fn malformed_ledger_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migrations.toml");
        std::fs::write(&path, "applied = \"this is not a table\"").unwrap();

        let ledger = MigrationLedger::load(&path);
        assert!(ledger.applied_ids().is_empty());
    }

    #[test]
    fn settings_version_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migrations.toml");

        let mut ledger = MigrationLedger::load(&path);
        ledger.set_settings_version(3).unwrap();
        assert_eq!(MigrationLedger::load(&path).settings_version(), 3);
    }
}
