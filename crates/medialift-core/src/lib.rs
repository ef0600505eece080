//! Domain model and site store for the Medialift upload client.
//!
//! This crate owns the non-UI heart of the app:
//!
//! - **[`Site`]** — A configured remote upload target: scheme, host URL,
//!   site identifier, credentials, and an upload folder expressed relative
//!   to the media-library root. Constructed fully or via
//!   [`Site::empty()`](Site::empty) (the "no site configured" sentinel).
//!
//! - **[`SiteStore`]** — Ordered, exclusively-owning collection of sites.
//!   Enforces selection exclusivity (at most one browse target, at most one
//!   upload target) store-wide, and broadcasts snapshot changes through a
//!   `watch` channel so the UI can refresh without polling.
//!
//! - **[`MediaLibraryRoot`]** — The injected base path under which every
//!   site's upload folder is resolved. Carries a documented default rather
//!   than hiding a process-wide constant.
//!
//! Persistence lives in `medialift-config`; on-disk migrations live in
//! `medialift-migrate`. This crate never touches the file system.

pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use model::{MediaLibraryRoot, SITE_DEFAULT_VALUE, Site, SiteId, SiteProtocol};
pub use store::{SiteSnapshot, SiteStore};
