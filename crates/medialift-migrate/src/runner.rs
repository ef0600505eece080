// ── Migration runner ──
//
// Walks registered strategies in registration order, once per launch,
// before UI. A strategy runs only if its id is absent from the ledger
// and can_apply is true; each success is recorded (and flushed)
// immediately. Failures are logged and skipped — no strategy blocks
// another, and the app starts regardless of the outcome.

use tracing::{debug, error, info};

use crate::error::MigrateError;
use crate::ledger::MigrationLedger;
use crate::strategy::MigrationStrategy;

/// Runner lifecycle per app launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    NotStarted,
    Running,
    /// Every eligible strategy applied and was recorded.
    Completed,
    /// At least one strategy failed; the rest still ran. Non-fatal.
    PartiallyFailed,
}

/// One strategy's failure, kept for reporting; never used for control
/// flow between strategies.
#[derive(Debug)]
pub struct StrategyFailure {
    pub id: &'static str,
    pub error: MigrateError,
}

/// What a single run did.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Ids applied and recorded during this run.
    pub applied: Vec<&'static str>,
    /// Ids skipped: already in the ledger, or `can_apply` was false.
    pub skipped: Vec<&'static str>,
    pub failures: Vec<StrategyFailure>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Ordered, once-per-install executor for migration strategies.
pub struct MigrationRunner {
    strategies: Vec<Box<dyn MigrationStrategy>>,
    ledger: MigrationLedger,
    state: RunnerState,
}

impl MigrationRunner {
    pub fn new(ledger: MigrationLedger) -> Self {
        Self {
            strategies: Vec::new(),
            ledger,
            state: RunnerState::NotStarted,
        }
    }

    /// Register a strategy. Registration order is execution order —
    /// later strategies may assume earlier ones have completed.
    pub fn register(&mut self, strategy: Box<dyn MigrationStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn ledger(&self) -> &MigrationLedger {
        &self.ledger
    }

    /// Execute all pending strategies. Synchronous; called at startup
    /// before any UI. Runs at most once per runner instance.
    pub fn run(&mut self) -> RunReport {
        if self.state != RunnerState::NotStarted {
            debug!("migration runner already ran this launch");
            return RunReport::default();
        }
        self.state = RunnerState::Running;

        let mut report = RunReport::default();

        for strategy in &self.strategies {
            let id = strategy.id();

            if self.ledger.is_applied(id) {
                debug!(strategy = id, "already applied, skipping");
                report.skipped.push(id);
                continue;
            }

            // Schema migrations are also gated by the version tag, so a
            // renumbered strategy list can't regress an upgraded install.
            if let Some(version) = strategy.establishes_settings_version() {
                if self.ledger.settings_version() >= version {
                    debug!(strategy = id, version, "settings already at version, skipping");
                    report.skipped.push(id);
                    continue;
                }
            }

            match strategy.can_apply() {
                Ok(false) => {
                    debug!(strategy = id, "nothing to do, skipping");
                    report.skipped.push(id);
                    continue;
                }
                Ok(true) => {}
                Err(err) => {
                    error!(strategy = id, %err, "can_apply failed");
                    report.failures.push(StrategyFailure { id, error: err });
                    continue;
                }
            }

            info!(strategy = id, "applying migration");
            if let Err(err) = strategy.apply() {
                error!(strategy = id, %err, "migration failed, continuing with next");
                report.failures.push(StrategyFailure { id, error: err });
                continue;
            }

            // Write-through: recorded before the next strategy runs, so
            // a crash here re-runs nothing already done.
            if let Err(err) = self.ledger.record(id) {
                error!(strategy = id, %err, "applied but failed to record in ledger");
                report.failures.push(StrategyFailure { id, error: err });
                continue;
            }
            if let Some(version) = strategy.establishes_settings_version() {
                if let Err(err) = self.ledger.set_settings_version(version) {
                    error!(strategy = id, %err, "failed to bump settings version tag");
                    report.failures.push(StrategyFailure { id, error: err });
                    continue;
                }
            }
            report.applied.push(id);
        }

        self.state = if report.is_clean() {
            RunnerState::Completed
        } else {
            RunnerState::PartiallyFailed
        };
        info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            state = ?self.state,
            "migration run finished"
        );
        report
    }
}
