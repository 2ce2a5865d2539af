//! CLI output formatting.

use std::time::Duration;

use memofib_orchestration::orchestrator::DriverReport;

/// Elapsed seconds with four decimal places.
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    format!("{:.4}", d.as_secs_f64())
}

/// One `F(n) = value` line.
#[must_use]
pub fn format_result_line(n: i64, value: u64) -> String {
    format!("F({n}) = {value}")
}

/// Serialize a driver report as pretty JSON.
pub fn report_to_json(report: &DriverReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
