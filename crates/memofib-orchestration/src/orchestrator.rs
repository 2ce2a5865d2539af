//! Concurrent driver: one task per index, results gathered in completion order.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use memofib_core::calculator::{Calculator, FibError};
use memofib_core::memo::MemoStats;

use crate::interfaces::ProgressReporter;
use crate::pool::WorkerPool;

/// Driver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Upper bound, inclusive.
    pub max_n: u64,
    /// Worker count.
    pub num_threads: usize,
}

/// A task whose calculation failed or panicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTask {
    /// Input the task was submitted for.
    pub n: i64,
    /// Why it failed.
    #[serde(serialize_with = "serialize_display")]
    pub error: FibError,
}

/// Outcome of a full driver run.
#[derive(Debug, Clone, Serialize)]
pub struct DriverReport {
    /// Name of the calculator the tasks invoked.
    pub calculator: String,
    /// Upper bound, inclusive.
    pub max_n: u64,
    /// Worker count.
    pub num_threads: usize,
    /// F(n) for every task that succeeded, keyed by n.
    pub results: BTreeMap<i64, u64>,
    /// Tasks excluded from `results`.
    pub failures: Vec<FailedTask>,
    /// Task inputs in the order their results arrived.
    pub completion_order: Vec<i64>,
    /// When the pool was created.
    #[serde(skip_serializing)]
    pub started_at: Instant,
    /// When the pool finished shutting down.
    #[serde(skip_serializing)]
    pub finished_at: Instant,
    /// `finished_at - started_at`.
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Cache counters after the run, if the calculator memoizes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<MemoStats>,
}

impl DriverReport {
    /// Number of tasks submitted.
    pub fn task_count(&self) -> u64 {
        self.max_n + 1
    }

    /// Whether every task produced a result.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.results.len() as u64 == self.task_count()
    }
}

/// Compute F(0..=max_n) on a bounded pool, tolerating per-task failures.
///
/// Only configuration problems (zero threads, an unrepresentable bound)
/// return `Err`. Task errors and panics are collected into
/// [`DriverReport::failures`] and never abort the batch.
pub fn run_concurrent(
    calc: &Arc<dyn Calculator>,
    config: &DriverConfig,
    progress: &dyn ProgressReporter,
) -> Result<DriverReport, FibError> {
    let last = i64::try_from(config.max_n)
        .map_err(|_| FibError::Config(format!("max_n {} is too large", config.max_n)))?;
    let total = config.max_n + 1;

    let mut pool = WorkerPool::new(config.num_threads)?;
    let started_at = Instant::now();
    pool.start()?;
    info!(
        calculator = calc.name(),
        max_n = config.max_n,
        threads = config.num_threads,
        "submitting tasks"
    );

    let (tx, rx) = crossbeam_channel::unbounded::<(i64, Result<u64, FibError>)>();
    for n in 0..=last {
        let calc = Arc::clone(calc);
        let tx = tx.clone();
        pool.submit(move || {
            let outcome = run_task(calc.as_ref(), n);
            let _ = tx.send((n, outcome));
        })?;
    }
    // Channel closes once every task has dropped its sender.
    drop(tx);

    let mut results = BTreeMap::new();
    let mut failures = Vec::new();
    let mut completion_order = Vec::new();
    for (n, outcome) in &rx {
        completion_order.push(n);
        match outcome {
            Ok(value) => {
                debug!(n, value, "task complete");
                results.insert(n, value);
            }
            Err(error) => {
                warn!(n, %error, "task failed");
                failures.push(FailedTask { n, error });
            }
        }
        progress.report(completion_order.len() as u64, total);
    }

    pool.shutdown();
    progress.complete();
    let finished_at = Instant::now();

    Ok(DriverReport {
        calculator: calc.name().to_string(),
        max_n: config.max_n,
        num_threads: config.num_threads,
        results,
        failures,
        completion_order,
        started_at,
        finished_at,
        elapsed: finished_at.duration_since(started_at),
        cache: calc.cache_stats(),
    })
}

/// Check every computed value against a reference calculator.
pub fn verify_results(report: &DriverReport, reference: &dyn Calculator) -> Result<(), FibError> {
    if report.results.is_empty() {
        return Err(FibError::Calculation("no valid results".into()));
    }

    for (&n, &value) in &report.results {
        match reference.calculate(n) {
            Ok(expected) if expected == value => {}
            other => {
                warn!(n, value, reference = ?other, "result mismatch");
                return Err(FibError::Mismatch);
            }
        }
    }

    Ok(())
}

/// Run one calculation, turning a panic into a [`FibError::TaskFailure`].
fn run_task(calc: &dyn Calculator, n: i64) -> Result<u64, FibError> {
    match panic::catch_unwind(AssertUnwindSafe(|| calc.calculate(n))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(FibError::TaskFailure {
            n,
            reason: panic_message(&*payload),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}

fn serialize_display<S: Serializer>(error: &FibError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    use memofib_core::constants::FIB_TABLE;
    use memofib_core::fibonacci::{IterativeFibonacci, MemoFibonacci};
    use memofib_core::options::Options;

    use crate::interfaces::NullProgressReporter;

    fn memo_calc(delay: Duration) -> Arc<dyn Calculator> {
        Arc::new(MemoFibonacci::new(Options::with_delay(delay)))
    }

    fn run(calc: &Arc<dyn Calculator>, max_n: u64, num_threads: usize) -> DriverReport {
        let config = DriverConfig { max_n, num_threads };
        run_concurrent(calc, &config, &NullProgressReporter).unwrap()
    }

    fn expected_up_to_ten() -> BTreeMap<i64, u64> {
        [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55]
            .into_iter()
            .enumerate()
            .map(|(n, v)| (n as i64, v))
            .collect()
    }

    /// Fails on odd inputs, panics on multiples of five.
    struct Flaky;

    impl Calculator for Flaky {
        fn calculate(&self, n: i64) -> Result<u64, FibError> {
            if n % 5 == 0 && n > 0 {
                panic!("flaky panic at {n}");
            }
            if n % 2 == 1 {
                return Err(FibError::Calculation(format!("odd input {n}")));
            }
            IterativeFibonacci::new().calculate(n)
        }

        fn name(&self) -> &str {
            "Flaky"
        }
    }

    #[test]
    fn single_and_multi_threaded_runs_agree() {
        let one = run(&memo_calc(Duration::from_micros(200)), 10, 1);
        let four = run(&memo_calc(Duration::from_micros(200)), 10, 4);
        assert_eq!(one.results, expected_up_to_ten());
        assert_eq!(four.results, expected_up_to_ten());
        assert!(one.is_complete());
        assert!(four.is_complete());
    }

    #[test]
    fn result_map_has_every_key() {
        let report = run(&memo_calc(Duration::ZERO), 50, 3);
        assert_eq!(report.results.len(), 51);
        assert_eq!(report.task_count(), 51);
        assert!(report.results.keys().copied().eq(0..=50));
        assert_eq!(report.calculator, "MemoFibonacci");
        assert_eq!(report.cache.map(|c| c.misses), Some(51));
    }

    #[test]
    fn reference_calculator_reports_no_cache() {
        let calc: Arc<dyn Calculator> = Arc::new(IterativeFibonacci::new());
        assert_eq!(run(&calc, 5, 2).cache, None);
    }

    #[test]
    fn completion_order_covers_all_tasks() {
        let report = run(&memo_calc(Duration::from_micros(100)), 20, 4);
        let mut order = report.completion_order.clone();
        order.sort_unstable();
        assert_eq!(order, (0..=20).collect::<Vec<_>>());
    }

    #[test]
    fn elapsed_is_consistent() {
        let report = run(&memo_calc(Duration::from_micros(100)), 5, 2);
        assert!(report.finished_at >= report.started_at);
        assert_eq!(
            report.elapsed,
            report.finished_at.duration_since(report.started_at)
        );
    }

    #[test]
    fn zero_max_n_runs_one_task() {
        let report = run(&memo_calc(Duration::ZERO), 0, 2);
        assert_eq!(report.results, BTreeMap::from([(0, 0)]));
    }

    #[test]
    fn failures_are_excluded_not_fatal() {
        let calc: Arc<dyn Calculator> = Arc::new(Flaky);
        let report = run(&calc, 10, 3);

        let expected: BTreeMap<i64, u64> = [0, 2, 4, 6, 8]
            .into_iter()
            .map(|n| (n, FIB_TABLE[n as usize]))
            .collect();
        assert_eq!(report.results, expected);

        let mut failed: Vec<i64> = report.failures.iter().map(|f| f.n).collect();
        failed.sort_unstable();
        assert_eq!(failed, vec![1, 3, 5, 7, 9, 10]);
        assert!(!report.is_complete());
    }

    #[test]
    fn panics_become_task_failures() {
        let calc: Arc<dyn Calculator> = Arc::new(Flaky);
        let report = run(&calc, 10, 2);
        let panicked = report.failures.iter().find(|f| f.n == 10).unwrap();
        assert_eq!(
            panicked.error,
            FibError::TaskFailure {
                n: 10,
                reason: "flaky panic at 10".into()
            }
        );
    }

    #[test]
    fn overflow_tasks_fail_individually() {
        let report = run(&memo_calc(Duration::ZERO), 95, 4);
        assert_eq!(report.results.len(), 94);
        assert_eq!(report.failures.len(), 2);
        assert!(report
            .failures
            .iter()
            .all(|f| matches!(f.error, FibError::Overflow(_))));
    }

    #[test]
    fn zero_threads_is_config_error() {
        let config = DriverConfig {
            max_n: 5,
            num_threads: 0,
        };
        let result = run_concurrent(&memo_calc(Duration::ZERO), &config, &NullProgressReporter);
        assert!(matches!(result, Err(FibError::Config(_))));
    }

    #[test]
    fn oversized_bound_is_config_error() {
        let config = DriverConfig {
            max_n: u64::MAX,
            num_threads: 1,
        };
        let result = run_concurrent(&memo_calc(Duration::ZERO), &config, &NullProgressReporter);
        assert!(matches!(result, Err(FibError::Config(_))));
    }

    #[test]
    fn progress_reports_every_completion() {
        struct Counting {
            reports: AtomicU64,
            last_total: AtomicU64,
            completed: AtomicU64,
        }
        impl ProgressReporter for Counting {
            fn report(&self, _completed: u64, total: u64) {
                self.reports.fetch_add(1, Ordering::Relaxed);
                self.last_total.store(total, Ordering::Relaxed);
            }
            fn complete(&self) {
                self.completed.fetch_add(1, Ordering::Relaxed);
            }
        }

        let reporter = Counting {
            reports: AtomicU64::new(0),
            last_total: AtomicU64::new(0),
            completed: AtomicU64::new(0),
        };
        let config = DriverConfig {
            max_n: 12,
            num_threads: 2,
        };
        run_concurrent(&memo_calc(Duration::ZERO), &config, &reporter).unwrap();
        assert_eq!(reporter.reports.load(Ordering::Relaxed), 13);
        assert_eq!(reporter.last_total.load(Ordering::Relaxed), 13);
        assert_eq!(reporter.completed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn verify_matching_results() {
        let report = run(&memo_calc(Duration::ZERO), 30, 4);
        assert!(verify_results(&report, &IterativeFibonacci::new()).is_ok());
    }

    #[test]
    fn verify_detects_mismatch() {
        let mut report = run(&memo_calc(Duration::ZERO), 10, 2);
        report.results.insert(7, 14);
        assert_eq!(
            verify_results(&report, &IterativeFibonacci::new()),
            Err(FibError::Mismatch)
        );
    }

    #[test]
    fn verify_empty_results() {
        let mut report = run(&memo_calc(Duration::ZERO), 3, 1);
        report.results.clear();
        assert!(matches!(
            verify_results(&report, &IterativeFibonacci::new()),
            Err(FibError::Calculation(_))
        ));
    }

    #[test]
    fn panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "task panicked");
    }
}
