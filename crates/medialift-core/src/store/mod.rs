// ── Site storage ──

mod site_store;

pub use site_store::{SiteSnapshot, SiteStore};
