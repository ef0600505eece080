//! One-shot upgrade migrations for Medialift on-disk state.
//!
//! An app upgrade may leave behind stale cache files or an old settings
//! schema. Each unit of cleanup is a [`MigrationStrategy`]: a stable
//! identifier, a side-effect-free `can_apply` predicate, and an
//! idempotent `apply`. The [`MigrationRunner`] walks registered
//! strategies in order at startup, consults the persisted
//! [`MigrationLedger`] so nothing ever runs twice across launches, and
//! records each success immediately — a crash between strategies costs
//! at most one re-run of an idempotent step.
//!
//! Strategy failures are logged and skipped, never fatal: the runner
//! ends [`Completed`](RunnerState::Completed) or
//! [`PartiallyFailed`](RunnerState::PartiallyFailed) and the app starts
//! either way.
//!
//! File-system work goes through the [`FileAccess`] trait so strategies
//! stay testable against a double.

pub mod error;
pub mod fs_access;
pub mod ledger;
pub mod runner;
pub mod strategies;
pub mod strategy;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::MigrateError;
pub use fs_access::{FileAccess, FileEntry, OsFileAccess};
pub use ledger::{LEGACY_SETTINGS_VERSION, MigrationLedger};
pub use runner::{MigrationRunner, RunReport, RunnerState, StrategyFailure};
pub use strategies::{RemoveOldFilesStrategy, SettingsSchemaStrategy, StaleFileMatcher};
pub use strategy::MigrationStrategy;
