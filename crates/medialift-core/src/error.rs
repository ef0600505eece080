// ── Core error types ──
//
// User-facing errors from medialift-core. Persistence and migration
// failures live in their own crates; this enum only covers store and
// model operations.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Site not found: {identifier}")]
    SiteNotFound { identifier: String },

    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },
}
