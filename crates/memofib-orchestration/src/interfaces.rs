//! Orchestration interfaces.

use crate::orchestrator::{DriverConfig, DriverReport, FailedTask};

/// Trait for reporting task completion to the user.
pub trait ProgressReporter: Send + Sync {
    /// `completed` of `total` tasks have finished.
    fn report(&self, completed: u64, total: u64);

    /// All tasks have finished.
    fn complete(&self);
}

/// Trait for presenting a driver run to the user.
pub trait ResultPresenter {
    /// Announce the run before any task is submitted.
    fn present_start(&self, config: &DriverConfig);

    /// Report one failed task.
    fn present_failure(&self, failure: &FailedTask);

    /// Present the computed values.
    fn present_results(&self, report: &DriverReport);

    /// Present timing and the completion marker.
    fn present_summary(&self, report: &DriverReport);
}

/// Null progress reporter (does nothing).
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn report(&self, _completed: u64, _total: u64) {}
    fn complete(&self) {}
}
