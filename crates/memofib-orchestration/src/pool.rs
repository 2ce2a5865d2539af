//! Fixed-size worker pool with an explicit lifecycle.
//!
//! Wraps a `rayon::ThreadPool` of exactly `num_threads` workers. Outstanding
//! jobs are tracked with a `crossbeam` `WaitGroup` so `shutdown` can drain
//! them before the threads are released.
//!
//! ```text
//! NotStarted --start--> Running --shutdown--> Draining --> Shutdown
//! ```

use std::fmt;

use crossbeam::sync::WaitGroup;
use tracing::{error, info};

use memofib_core::calculator::FibError;

/// Lifecycle state of a [`WorkerPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Created, no threads yet.
    NotStarted,
    /// Accepting jobs.
    Running,
    /// Waiting for outstanding jobs; no new submissions.
    Draining,
    /// Threads released. Terminal.
    Shutdown,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not-started",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// A bounded pool of worker threads.
pub struct WorkerPool {
    num_threads: usize,
    state: PoolState,
    pool: Option<rayon::ThreadPool>,
    outstanding: Option<WaitGroup>,
}

impl WorkerPool {
    /// Create a pool that will run at most `num_threads` jobs at once.
    pub fn new(num_threads: usize) -> Result<Self, FibError> {
        if num_threads == 0 {
            return Err(FibError::Config(
                "worker pool needs at least one thread".into(),
            ));
        }
        Ok(Self {
            num_threads,
            state: PoolState::NotStarted,
            pool: None,
            outstanding: None,
        })
    }

    /// Spawn the worker threads.
    pub fn start(&mut self) -> Result<(), FibError> {
        if self.state != PoolState::NotStarted {
            return Err(FibError::Config(format!(
                "cannot start a {} pool",
                self.state
            )));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .thread_name(|i| format!("memofib-worker-{i}"))
            .panic_handler(|_| error!("worker job panicked outside task isolation"))
            .build()
            .map_err(|e| FibError::Config(format!("failed to build worker pool: {e}")))?;

        self.pool = Some(pool);
        self.outstanding = Some(WaitGroup::new());
        self.state = PoolState::Running;
        info!(threads = self.num_threads, "worker pool started");
        Ok(())
    }

    /// Queue a job. Only accepted while the pool is running.
    pub fn submit<F>(&self, job: F) -> Result<(), FibError>
    where
        F: FnOnce() + Send + 'static,
    {
        match (&self.pool, &self.outstanding, self.state) {
            (Some(pool), Some(outstanding), PoolState::Running) => {
                let guard = outstanding.clone();
                pool.spawn(move || {
                    job();
                    drop(guard);
                });
                Ok(())
            }
            _ => Err(FibError::Config(format!(
                "cannot submit to a {} pool",
                self.state
            ))),
        }
    }

    /// Wait for every submitted job, then release the threads.
    ///
    /// Calling this on a pool that never started, or twice, just marks it
    /// shut down.
    pub fn shutdown(&mut self) {
        if self.state == PoolState::Shutdown {
            return;
        }
        if let Some(outstanding) = self.outstanding.take() {
            self.state = PoolState::Draining;
            outstanding.wait();
        }
        self.pool = None;
        self.state = PoolState::Shutdown;
        info!(threads = self.num_threads, "worker pool shut down");
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PoolState {
        self.state
    }

    /// Configured worker count.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
