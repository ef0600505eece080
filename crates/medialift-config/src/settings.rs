// ── Persisted site settings ──
//
// Versioned TOML document holding the ordered site list. Two shapes are
// accepted on disk: the current schema (carries a `version` marker) and
// the legacy flat single-site bag written by old installs. Legacy data
// is migrated field-by-field on decode; nothing previously stored is
// dropped.

use std::io::Write;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use medialift_core::{MediaLibraryRoot, SITE_DEFAULT_VALUE, Site, SiteId, SiteProtocol, SiteStore};

use crate::SettingsError;

/// Current on-disk schema version.
pub const SETTINGS_VERSION: u32 = 2;

// ── Current schema ──────────────────────────────────────────────────

/// The persisted settings document, current shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Schema marker; absent in legacy files.
    pub version: u32,

    #[serde(default)]
    pub media_library_root: MediaLibraryRoot,

    /// Ordered site records — file order is display order.
    #[serde(default)]
    pub sites: Vec<SiteEntry>,
}

impl UploadSettings {
    /// Fresh settings with a single empty-site placeholder.
    pub fn default_with_empty_site() -> Self {
        Self {
            version: SETTINGS_VERSION,
            media_library_root: MediaLibraryRoot::default(),
            sites: vec![SiteEntry::from_site(&Site::empty())],
        }
    }

    /// Build a live store from these settings.
    pub fn to_store(&self) -> SiteStore {
        SiteStore::from_sites(self.sites.iter().map(SiteEntry::to_site).collect())
    }

    /// Capture the store's current state for saving.
    pub fn from_store(store: &SiteStore, media_library_root: MediaLibraryRoot) -> Self {
        Self {
            version: SETTINGS_VERSION,
            media_library_root,
            sites: store
                .sites()
                .iter()
                .map(|site| SiteEntry::from_site(site))
                .collect(),
        }
    }
}

/// One persisted site record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteEntry {
    /// Stable identity across launches; generated if absent.
    #[serde(default)]
    pub id: SiteId,

    #[serde(default)]
    pub protocol: SiteProtocol,

    pub site_url: String,

    #[serde(default = "default_site")]
    pub site: String,

    #[serde(default)]
    pub upload_folder: String,

    #[serde(default)]
    pub username: String,

    /// Plaintext password — prefer the keyring or `MEDIALIFT_PASSWORD`
    /// (see [`crate::credentials`]). Kept round-trippable so an existing
    /// plaintext value is never silently dropped on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub selected_for_browse: bool,

    #[serde(default)]
    pub selected_for_upload: bool,
}

fn default_site() -> String {
    SITE_DEFAULT_VALUE.into()
}

impl SiteEntry {
    pub fn to_site(&self) -> Site {
        Site::new(
            self.site_url.clone(),
            self.site.clone(),
            self.upload_folder.clone(),
            self.username.clone(),
            SecretString::from(self.password.clone().unwrap_or_default()),
        )
        .with_id(self.id)
        .with_protocol(self.protocol)
        .with_selection(self.selected_for_browse, self.selected_for_upload)
    }

    pub fn from_site(site: &Site) -> Self {
        let password = site.password().expose_secret();
        Self {
            id: site.id(),
            protocol: site.protocol(),
            site_url: site.site_url().to_owned(),
            site: site.site().to_owned(),
            upload_folder: site.upload_folder().to_owned(),
            username: site.username().to_owned(),
            password: (!password.is_empty()).then(|| password.to_owned()),
            selected_for_browse: site.selected_for_browse(),
            selected_for_upload: site.selected_for_upload(),
        }
    }
}

// ── Legacy schema ───────────────────────────────────────────────────

/// Flat single-site settings bag written by pre-versioning installs.
/// No `version` marker; the scheme was a free-form string.
#[derive(Debug, Deserialize)]
struct LegacySettings {
    site_url: String,

    #[serde(default)]
    site: Option<String>,

    #[serde(default)]
    upload_folder_path_inside_media_library: Option<String>,

    #[serde(default)]
    username: Option<String>,

    #[serde(default)]
    password: Option<String>,

    #[serde(default)]
    site_protocol: Option<String>,
}

/// Explicit field-by-field migration of the legacy shape.
///
/// The legacy file held exactly one site, which was implicitly both the
/// browse and the upload target, so the migrated record gets both flags.
fn migrate_legacy(legacy: LegacySettings) -> UploadSettings {
    let protocol = legacy
        .site_protocol
        .as_deref()
        .map_or(SiteProtocol::Http, SiteProtocol::from_legacy);

    let entry = SiteEntry {
        id: SiteId::new(),
        protocol,
        site_url: legacy.site_url,
        site: legacy.site.unwrap_or_else(default_site),
        upload_folder: legacy.upload_folder_path_inside_media_library.unwrap_or_default(),
        username: legacy.username.unwrap_or_default(),
        password: legacy.password.filter(|p| !p.is_empty()),
        selected_for_browse: true,
        selected_for_upload: true,
    };

    UploadSettings {
        version: SETTINGS_VERSION,
        media_library_root: MediaLibraryRoot::default(),
        sites: vec![entry],
    }
}

// ── Versioned decode ────────────────────────────────────────────────

/// The two shapes a settings file can arrive in. Current first: its
/// `version` marker disambiguates, so a current file never matches the
/// legacy variant.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SettingsFile {
    Current(UploadSettings),
    Legacy(LegacySettings),
}

/// Result of decoding a settings document.
#[derive(Debug)]
pub enum DecodedSettings {
    /// Already in the current schema.
    Current(UploadSettings),
    /// Was legacy-shaped; carried value is the migrated document.
    Migrated(UploadSettings),
}

impl DecodedSettings {
    pub fn into_settings(self) -> UploadSettings {
        match self {
            Self::Current(s) | Self::Migrated(s) => s,
        }
    }

    pub fn was_legacy(&self) -> bool {
        matches!(self, Self::Migrated(_))
    }
}

/// Decode a settings document, migrating the legacy shape if present.
pub fn decode_settings(text: &str) -> Result<DecodedSettings, SettingsError> {
    match toml::from_str::<SettingsFile>(text)? {
        SettingsFile::Current(settings) => Ok(DecodedSettings::Current(settings)),
        SettingsFile::Legacy(legacy) => {
            debug!("settings file is legacy-shaped, migrating in memory");
            Ok(DecodedSettings::Migrated(migrate_legacy(legacy)))
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────────

/// Load settings from disk, fail-soft.
///
/// Missing or malformed data yields a default document with one
/// empty-site record — a user-facing app must start either way. The
/// fault is logged, never propagated.
pub fn load_settings(path: &Path) -> UploadSettings {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            debug!(path = %path.display(), %err, "no readable settings file, using defaults");
            return UploadSettings::default_with_empty_site();
        }
    };

    match decode_settings(&text) {
        Ok(decoded) => decoded.into_settings(),
        Err(err) => {
            warn!(path = %path.display(), %err, "malformed settings file, using defaults");
            UploadSettings::default_with_empty_site()
        }
    }
}

/// Save settings atomically: write a temp file in the target directory,
/// flush, then rename over the target. A crash mid-save leaves either
/// the old or the new complete document, never a torn one. Failures
/// surface to the caller — silently losing a save is unacceptable.
pub fn save_settings(path: &Path, settings: &UploadSettings) -> Result<(), SettingsError> {
    let parent = path.parent().ok_or_else(|| SettingsError::Validation {
        field: "path".into(),
        reason: format!("no parent directory for {}", path.display()),
    })?;
    std::fs::create_dir_all(parent)?;

    let toml_str = toml::to_string_pretty(settings)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(toml_str.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| SettingsError::Io(e.error))?;
    Ok(())
}
