//! Application configuration from CLI flags.

use std::time::Duration;

use clap::Parser;

use memofib_core::calculator::FibError;

/// MemoFib: concurrent memoized Fibonacci on a bounded worker pool.
#[derive(Parser, Debug)]
#[command(name = "memofib", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Compute F(0) through F(MAX_N).
    #[arg(short = 'n', long, default_value = "15")]
    pub max_n: u64,

    /// Number of worker threads.
    #[arg(short, long, default_value = "4")]
    pub threads: usize,

    /// Artificial delay per cache miss (e.g., "500us", "1ms", "0").
    #[arg(long, default_value = "500us")]
    pub delay: String,

    /// Print every computed value.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (no banner or progress bar).
    #[arg(short, long)]
    pub quiet: bool,

    /// Cross-check results against the iterative reference.
    #[arg(long)]
    pub verify: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse the delay string into a Duration.
    pub fn delay_duration(&self) -> Result<Duration, FibError> {
        parse_duration(&self.delay)
            .ok_or_else(|| FibError::Config(format!("invalid delay: {:?}", self.delay)))
    }
}

/// Parse a duration string like "500us", "1ms", "30s", "5m", "1h".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(us) = s.strip_suffix("us") {
        let n: u64 = us.parse().ok()?;
        Some(Duration::from_micros(n))
    } else if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}
