//! The `Calculator` trait and the error type shared by the workspace.

use crate::memo::MemoStats;

/// Error type for Fibonacci calculations and their orchestration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FibError {
    /// The input index was negative.
    #[error("input must be a non-negative integer, got {0}")]
    InvalidArgument(i64),

    /// F(n) does not fit in a `u64`.
    #[error("F({0}) overflows a 64-bit unsigned integer")]
    Overflow(u64),

    /// A submitted task failed outside the calculation itself.
    #[error("task for n={n} failed: {reason}")]
    TaskFailure {
        /// Input the task was submitted for.
        n: i64,
        /// Panic payload or other failure description.
        reason: String,
    },

    /// A calculation error occurred.
    #[error("calculation error: {0}")]
    Calculation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Computed results disagree with the reference calculator.
    #[error("result mismatch against reference calculator")]
    Mismatch,
}

/// A single-argument Fibonacci function, shareable across worker threads.
pub trait Calculator: Send + Sync {
    /// Calculate F(n).
    fn calculate(&self, n: i64) -> Result<u64, FibError>;

    /// Get the name of this calculator.
    fn name(&self) -> &str;

    /// Cache counters, for calculators that memoize.
    fn cache_stats(&self) -> Option<MemoStats> {
        None
    }
}
