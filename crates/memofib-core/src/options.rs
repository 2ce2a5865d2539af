//! Calculation options.

use std::time::Duration;

use crate::constants::DEFAULT_WORK_DELAY;

/// Options for the memoized calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Blocking delay performed on every cache miss, standing in for I/O.
    pub work_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            work_delay: DEFAULT_WORK_DELAY,
        }
    }
}

impl Options {
    /// Build options with the given per-miss delay.
    #[must_use]
    pub fn with_delay(work_delay: Duration) -> Self {
        Self { work_delay }
    }

    /// Whether a cache miss actually sleeps.
    #[must_use]
    pub fn simulates_work(&self) -> bool {
        !self.work_delay.is_zero()
    }
}
