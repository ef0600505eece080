// ── Domain model ──

mod media_library;
mod protocol;
mod site;
mod site_id;

pub use media_library::{MEDIA_LIBRARY_DEFAULT_PATH, MediaLibraryRoot, SITE_DEFAULT_VALUE};
pub use protocol::SiteProtocol;
pub use site::Site;
pub use site_id::SiteId;
