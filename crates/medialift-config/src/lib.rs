//! Persisted settings and credential resolution for Medialift.
//!
//! Two kinds of on-disk state live here:
//!
//! - **App configuration** ([`AppConfig`]) — tunables with documented
//!   defaults (media-library root, default site value, cache directory),
//!   loaded via figment: defaults → TOML file → `MEDIALIFT_`-prefixed
//!   environment.
//! - **Site settings** ([`settings`]) — the ordered list of configured
//!   sites, versioned on disk. Loading is fail-soft (malformed data falls
//!   back to a single empty-site default); saving is atomic (temp file +
//!   rename) and surfaces errors to the caller.
//!
//! Credential resolution ([`credentials`]) follows the usual chain:
//! environment variable → OS keyring → plaintext settings field.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use medialift_core::{MediaLibraryRoot, SITE_DEFAULT_VALUE};

pub mod credentials;
pub mod settings;

pub use settings::{
    DecodedSettings, SETTINGS_VERSION, SiteEntry, UploadSettings, load_settings, save_settings,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for site '{site}'")]
    NoCredentials { site: String },

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for SettingsError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── App configuration ───────────────────────────────────────────────

/// App-level tunables with documented defaults.
///
/// These are deliberately injected values, not process-wide constants:
/// the core crate receives the media-library root from here, which keeps
/// it testable without global state.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Base path of the media library on the remote instance.
    #[serde(default)]
    pub media_library_root: MediaLibraryRoot,

    /// Site identifier pre-filled for a freshly added record.
    #[serde(default = "default_site")]
    pub site_default: String,

    /// Override for the local cache directory scanned by migrations.
    pub cache_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            media_library_root: MediaLibraryRoot::default(),
            site_default: default_site(),
            cache_dir: None,
        }
    }
}

fn default_site() -> String {
    SITE_DEFAULT_VALUE.into()
}

/// Load the app configuration from file + environment.
pub fn load_app_config() -> Result<AppConfig, SettingsError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("MEDIALIFT_"));

    let config: AppConfig = figment.extract()?;
    Ok(config)
}

// ── File paths ──────────────────────────────────────────────────────

/// Resolve the app config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dir("config.toml")
}

/// Resolve the persisted site-settings file path.
pub fn sites_path() -> PathBuf {
    project_dir("sites.toml")
}

/// Resolve the migration-ledger file path.
pub fn ledger_path() -> PathBuf {
    project_dir("migrations.toml")
}

fn project_dir(file: &str) -> PathBuf {
    ProjectDirs::from("com", "medialift", "medialift").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push(file);
            p
        },
        |dirs| dirs.config_dir().join(file),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("medialift");
    p
}
