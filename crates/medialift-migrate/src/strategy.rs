// ── Strategy contract ──

use crate::error::MigrateError;

/// One unit of upgrade work, applied at most once per install.
///
/// Contract:
///
/// - [`id`](Self::id) is the completion-tracking key. It must never
///   change once a release has shipped with it — renaming an id would
///   re-run the strategy on every existing install.
/// - [`can_apply`](Self::can_apply) inspects on-disk/schema state and
///   has no side effects. IO failures surface as `Err` and count as a
///   strategy failure.
/// - [`apply`](Self::apply) must be idempotent and safe to interrupt:
///   if the process dies before the runner records the id, the next
///   launch will call `apply` again on whatever half-done state remains.
///
/// Required collaborators (file access, root directories) are taken at
/// construction, and constructors validate them there — a strategy never
/// discovers a missing collaborator inside `apply`.
pub trait MigrationStrategy {
    /// Stable identifier, used as the ledger key.
    fn id(&self) -> &'static str;

    /// Does current state call for this migration?
    fn can_apply(&self) -> Result<bool, MigrateError>;

    /// Perform the migration.
    fn apply(&self) -> Result<(), MigrateError>;

    /// Settings-schema version this strategy brings the install to, if
    /// it is a schema migration. The runner skips the strategy when the
    /// ledger's version tag already meets it, and bumps the tag after a
    /// successful apply.
    fn establishes_settings_version(&self) -> Option<u32> {
        None
    }
}
