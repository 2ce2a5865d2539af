//! Memoized and reference Fibonacci calculators.
//!
//! `MemoFibonacci` evaluates misses with an explicit work stack instead of
//! native recursion: an index is only computed once both of its predecessors
//! are cached, so stack depth stays constant no matter how large `n` is.

use tracing::{debug, trace};

use crate::calculator::{Calculator, FibError};
use crate::memo::{MemoStats, Memoizer};
use crate::options::Options;

/// Fibonacci function backed by a shared compute-once cache.
///
/// Each cache miss blocks for `Options::work_delay` before storing its
/// result. Hits return immediately.
pub struct MemoFibonacci {
    memo: Memoizer<u64, u64>,
    opts: Options,
}

impl MemoFibonacci {
    /// Create a calculator with an empty cache.
    #[must_use]
    pub fn new(opts: Options) -> Self {
        Self {
            memo: Memoizer::new(),
            opts,
        }
    }

    /// Calculate F(n), filling the cache for every missing index below `n`.
    pub fn calculate(&self, n: i64) -> Result<u64, FibError> {
        let index = u64::try_from(n).map_err(|_| FibError::InvalidArgument(n))?;

        if let Some(value) = self.memo.get(&index) {
            trace!(n = index, "cache hit");
            return Ok(value);
        }

        self.fill(index)
    }

    /// Cache counters.
    pub fn stats(&self) -> MemoStats {
        self.memo.stats()
    }

    /// Number of indices currently cached.
    pub fn cached_len(&self) -> usize {
        self.memo.len()
    }

    /// Whether F(n) is already cached.
    pub fn is_cached(&self, n: u64) -> bool {
        self.memo.contains(&n)
    }

    fn fill(&self, target: u64) -> Result<u64, FibError> {
        let mut pending = vec![target];

        while let Some(&k) = pending.last() {
            if k >= 2 && !self.memo.contains(&k) {
                let depth = pending.len();
                pending.extend([k - 1, k - 2].into_iter().filter(|i| !self.memo.contains(i)));
                if pending.len() > depth {
                    continue;
                }
            }

            let value = self
                .memo
                .get_or_try_insert_with(k, |&k| self.compute_step(k))?;
            pending.pop();
            if pending.is_empty() {
                return Ok(value);
            }
        }

        Err(FibError::Calculation(format!(
            "work stack drained before F({target}) was stored"
        )))
    }

    /// Compute F(k) from cached predecessors. Runs once per index.
    fn compute_step(&self, k: u64) -> Result<u64, FibError> {
        if self.opts.simulates_work() {
            std::thread::sleep(self.opts.work_delay);
        }

        let value = if k < 2 {
            k
        } else {
            let a = self.predecessor(k - 1)?;
            let b = self.predecessor(k - 2)?;
            a.checked_add(b).ok_or(FibError::Overflow(k))?
        };

        debug!(n = k, value, "cache miss computed");
        Ok(value)
    }

    fn predecessor(&self, k: u64) -> Result<u64, FibError> {
        self.memo
            .get(&k)
            .ok_or_else(|| FibError::Calculation(format!("F({k}) missing from cache")))
    }
}

impl Default for MemoFibonacci {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Calculator for MemoFibonacci {
    fn calculate(&self, n: i64) -> Result<u64, FibError> {
        MemoFibonacci::calculate(self, n)
    }

    fn name(&self) -> &str {
        "MemoFibonacci"
    }

    fn cache_stats(&self) -> Option<MemoStats> {
        Some(self.stats())
    }
}

/// Bottom-up reference calculator: no cache, no delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct IterativeFibonacci;

impl IterativeFibonacci {
    /// Create a new reference calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Calculator for IterativeFibonacci {
    fn calculate(&self, n: i64) -> Result<u64, FibError> {
        let n = u64::try_from(n).map_err(|_| FibError::InvalidArgument(n))?;
        if n == 0 {
            return Ok(0);
        }
        let (mut prev, mut cur) = (0u64, 1u64);
        for i in 2..=n {
            let next = prev.checked_add(cur).ok_or(FibError::Overflow(i))?;
            prev = cur;
            cur = next;
        }
        Ok(cur)
    }

    fn name(&self) -> &str {
        "Iterative"
    }
}
