// ── Media-library root ──
//
// Every site's upload folder is stored *relative* to this root. The root
// is injected (config crate owns the value) so the core stays testable;
// the constants below are the documented defaults, not hidden globals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default base path of the media library on the remote instance.
pub const MEDIA_LIBRARY_DEFAULT_PATH: &str = "/sitecore/media library";

/// Default site identifier for a freshly added record.
pub const SITE_DEFAULT_VALUE: &str = "website";

/// Base path under which all site upload folders are resolved.
///
/// Stored without a trailing slash; [`join`](Self::join) normalizes the
/// separator so callers never worry about how the relative path was typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaLibraryRoot(String);

impl MediaLibraryRoot {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self(path.trim_end_matches('/').to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve a relative upload folder against the root.
    ///
    /// `"folder"`, `"/folder"`, and `"folder/"` all yield `{root}/folder`;
    /// an empty or slash-only relative path yields the root itself.
    pub fn join(&self, relative: &str) -> String {
        let trimmed = relative.trim().trim_matches('/');
        if trimmed.is_empty() {
            self.0.clone()
        } else {
            format!("{}/{trimmed}", self.0)
        }
    }
}

impl Default for MediaLibraryRoot {
    fn default() -> Self {
        Self::new(MEDIA_LIBRARY_DEFAULT_PATH)
    }
}

impl fmt::Display for MediaLibraryRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
