//! # memofib-orchestration
//!
//! Bounded worker pool, the concurrent driver that fans one task per index
//! out to it, and result verification.

pub mod interfaces;
pub mod orchestrator;
pub mod pool;

pub use interfaces::{ProgressReporter, ResultPresenter};
pub use orchestrator::{run_concurrent, verify_results, DriverConfig, DriverReport, FailedTask};
pub use pool::{PoolState, WorkerPool};
