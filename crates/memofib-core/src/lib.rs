//! # memofib-core
//!
//! Compute-once memoization shared across threads, and a memoized Fibonacci
//! function built on it.

pub mod calculator;
pub mod constants;
pub mod fibonacci;
pub mod memo;
pub mod options;

// Re-exports
pub use calculator::{Calculator, FibError};
pub use constants::{exit_codes, DEFAULT_WORK_DELAY, FIB_TABLE, MAX_FIB_U64};
pub use fibonacci::{IterativeFibonacci, MemoFibonacci};
pub use memo::{MemoStats, Memoizer};
pub use options::Options;

/// Compute F(n) through a fresh memoized calculator with no artificial delay.
///
/// # Example
/// ```
/// assert_eq!(memofib_core::fibonacci(10), Ok(55));
/// assert!(memofib_core::fibonacci(-1).is_err());
/// ```
pub fn fibonacci(n: i64) -> Result<u64, FibError> {
    let opts = Options {
        work_delay: std::time::Duration::ZERO,
    };
    MemoFibonacci::new(opts).calculate(n)
}
