//! Error handling and exit codes.

use memofib_core::calculator::FibError;
use memofib_core::constants::exit_codes;

/// Map a run-level error to the process exit code.
///
/// Per-task failures never reach here; they are part of the report.
pub fn handle_error(err: &FibError) -> i32 {
    match err {
        FibError::Config(_) => exit_codes::ERROR_CONFIG,
        FibError::Mismatch => exit_codes::ERROR_MISMATCH,
        FibError::InvalidArgument(_)
        | FibError::Overflow(_)
        | FibError::TaskFailure { .. }
        | FibError::Calculation(_) => exit_codes::ERROR_GENERIC,
    }
}
