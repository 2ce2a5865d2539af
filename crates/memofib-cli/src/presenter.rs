//! CLI result presenter and progress reporter.

use indicatif::{ProgressBar, ProgressStyle};

use memofib_orchestration::interfaces::{ProgressReporter, ResultPresenter};
use memofib_orchestration::orchestrator::{DriverConfig, DriverReport, FailedTask};

use crate::output::{format_elapsed, format_result_line};
use crate::ui::{print_header, print_success};

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    /// `verbose` prints every result line; `quiet` keeps only the summary.
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_start(&self, config: &DriverConfig) {
        if self.quiet {
            return;
        }
        println!(
            "Calculating Fibonacci numbers up to {} concurrently using {} threads...",
            config.max_n, config.num_threads
        );
    }

    fn present_failure(&self, failure: &FailedTask) {
        eprintln!("Fib({}) generated an exception: {}", failure.n, failure.error);
    }

    fn present_results(&self, report: &DriverReport) {
        if !self.verbose {
            return;
        }
        for (&n, &value) in &report.results {
            println!("{}", format_result_line(n, value));
        }
    }

    fn present_summary(&self, report: &DriverReport) {
        if !self.quiet {
            println!();
            print_header("Execution");
        }
        println!(
            "Total time taken for Fibonacci up to {}: {} seconds",
            report.max_n,
            format_elapsed(report.elapsed)
        );
        print_success("Calculation complete.");
    }
}

/// Progress bar on stderr counting finished tasks.
pub struct CLIProgressReporter {
    bar: ProgressBar,
}

impl CLIProgressReporter {
    /// A visible bar, or a hidden one when `hidden` is set.
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        if hidden {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} tasks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressReporter for CLIProgressReporter {
    fn report(&self, completed: u64, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(completed);
    }

    fn complete(&self) {
        self.bar.finish_and_clear();
    }
}
