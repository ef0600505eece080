// ── Site record ──
//
// One configured remote upload target. The record itself does no
// cross-record validation; the SiteStore enforces selection exclusivity
// and treats the empty site as a placeholder, never a real target.

use secrecy::SecretString;

use super::media_library::MediaLibraryRoot;
use super::protocol::SiteProtocol;
use super::site_id::SiteId;

/// A configured remote site the app can browse or upload to.
///
/// Field mutation goes through the explicit setters; the selection flags
/// are read-only outside the core crate and flipped only by
/// [`SiteStore`](crate::SiteStore) select operations, which keep the
/// at-most-one-selected invariant across the whole store.
#[derive(Debug, Clone)]
pub struct Site {
    id: SiteId,
    protocol: SiteProtocol,
    site_url: String,
    site: String,
    upload_folder: String,
    username: String,
    password: SecretString,
    selected_for_browse: bool,
    selected_for_upload: bool,
}

impl Site {
    /// Create a record from user-entered fields.
    ///
    /// No validation beyond what the types enforce — a record with an
    /// empty URL is simply treated as the empty sentinel by the store.
    pub fn new(
        site_url: impl Into<String>,
        site: impl Into<String>,
        upload_folder: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            id: SiteId::new(),
            protocol: SiteProtocol::default(),
            site_url: site_url.into(),
            site: site.into(),
            upload_folder: upload_folder.into(),
            username: username.into(),
            password,
            selected_for_browse: false,
            selected_for_upload: false,
        }
    }

    /// The "no site configured" sentinel: empty strings, nothing selected.
    ///
    /// Used instead of an optional record so consumers never branch on
    /// `None` — an empty site is renderable and editable like any other.
    pub fn empty() -> Self {
        Self::new("", "", "", "", SecretString::from(String::new()))
    }

    // ── Construction-time builders (persistence restore) ─────────────

    pub fn with_protocol(mut self, protocol: SiteProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Restore selection flags from persisted state.
    ///
    /// Only meaningful at load time; after the store takes ownership,
    /// selection changes go through its select operations.
    pub fn with_selection(mut self, for_browse: bool, for_upload: bool) -> Self {
        self.selected_for_browse = for_browse;
        self.selected_for_upload = for_upload;
        self
    }

    pub fn with_id(mut self, id: SiteId) -> Self {
        self.id = id;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn id(&self) -> SiteId {
        self.id
    }

    pub fn protocol(&self) -> SiteProtocol {
        self.protocol
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    /// Upload folder path relative to the media-library root, as stored.
    pub fn upload_folder(&self) -> &str {
        &self.upload_folder
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn selected_for_browse(&self) -> bool {
        self.selected_for_browse
    }

    pub fn selected_for_upload(&self) -> bool {
        self.selected_for_upload
    }

    /// A record with no URL and no site identifier is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.site_url.is_empty() && self.site.is_empty()
    }

    /// Full upload path: media-library root + slash-normalized folder.
    pub fn upload_path(&self, root: &MediaLibraryRoot) -> String {
        root.join(&self.upload_folder)
    }

    // ── Field setters ────────────────────────────────────────────────

    pub fn set_protocol(&mut self, protocol: SiteProtocol) {
        self.protocol = protocol;
    }

    pub fn set_site_url(&mut self, site_url: impl Into<String>) {
        self.site_url = site_url.into();
    }

    pub fn set_site(&mut self, site: impl Into<String>) {
        self.site = site.into();
    }

    pub fn set_upload_folder(&mut self, upload_folder: impl Into<String>) {
        self.upload_folder = upload_folder.into();
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: SecretString) {
        self.password = password;
    }

    // ── Selection (store-internal) ───────────────────────────────────

    pub(crate) fn set_selected_for_browse(&mut self, selected: bool) {
        self.selected_for_browse = selected;
    }

    pub(crate) fn set_selected_for_upload(&mut self, selected: bool) {
        self.selected_for_upload = selected;
    }
}

impl PartialEq for Site {
    /// Identity comparison — two records are the same site if they share
    /// an id, regardless of field edits in between.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Site {}
