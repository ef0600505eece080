// ── Settings-schema strategy ──
//
// Rewrites a legacy-shaped settings file in the current schema. The
// heavy lifting (versioned decode, field-by-field migration) lives in
// medialift-config; this strategy just decides when to run it and makes
// the result durable.

use std::path::PathBuf;

use tracing::info;

use medialift_config::SETTINGS_VERSION;
use medialift_config::settings::{decode_settings, save_settings};

use crate::error::MigrateError;
use crate::strategy::MigrationStrategy;

/// One-shot rewrite of the settings file into the current schema.
///
/// Idempotent by construction: once the file is current-shaped,
/// `can_apply` is false and `apply` is a no-op. A malformed file is not
/// this strategy's problem — the fail-soft loader replaces it with
/// defaults at startup.
#[derive(Debug)]
pub struct SettingsSchemaStrategy {
    settings_path: PathBuf,
}

impl SettingsSchemaStrategy {
    pub fn new(settings_path: impl Into<PathBuf>) -> Result<Self, MigrateError> {
        let settings_path = settings_path.into();
        if settings_path.as_os_str().is_empty() {
            return Err(MigrateError::Construction {
                reason: "settings path must not be empty".into(),
            });
        }
        Ok(Self { settings_path })
    }

    fn read_legacy(&self) -> Option<medialift_config::UploadSettings> {
        let text = std::fs::read_to_string(&self.settings_path).ok()?;
        match decode_settings(&text) {
            Ok(decoded) if decoded.was_legacy() => Some(decoded.into_settings()),
            _ => None,
        }
    }
}

impl MigrationStrategy for SettingsSchemaStrategy {
    fn id(&self) -> &'static str {
        "settings-schema-v2"
    }

    fn can_apply(&self) -> Result<bool, MigrateError> {
        Ok(self.read_legacy().is_some())
    }

    fn apply(&self) -> Result<(), MigrateError> {
        let Some(migrated) = self.read_legacy() else {
            // Missing or already current — nothing to do.
            return Ok(());
        };
        save_settings(&self.settings_path, &migrated)?;
        info!(path = %self.settings_path.display(), "settings file migrated to current schema");
        Ok(())
    }

    fn establishes_settings_version(&self) -> Option<u32> {
        Some(SETTINGS_VERSION)
    }
}
