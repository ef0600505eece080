// ── Migration error types ──

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the migration crate.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// A strategy was built with a missing or invalid collaborator.
    /// Always raised at construction time, never from `apply`.
    #[error("invalid strategy construction: {reason}")]
    Construction { reason: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize migration ledger: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("settings error: {0}")]
    Settings(#[from] medialift_config::SettingsError),
}

impl MigrateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
