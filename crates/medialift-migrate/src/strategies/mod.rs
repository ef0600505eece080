// ── Concrete migration strategies ──

mod remove_old_files;
mod settings_schema;

pub use remove_old_files::{RemoveOldFilesStrategy, StaleFileMatcher};
pub use settings_schema::SettingsSchemaStrategy;
