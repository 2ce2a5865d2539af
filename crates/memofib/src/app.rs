//! Application entry point and dispatch.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use memofib_cli::output::report_to_json;
use memofib_cli::presenter::{CLIProgressReporter, CLIResultPresenter};
use memofib_core::calculator::Calculator;
use memofib_core::fibonacci::{IterativeFibonacci, MemoFibonacci};
use memofib_core::options::Options;
use memofib_orchestration::interfaces::ResultPresenter;
use memofib_orchestration::orchestrator::{run_concurrent, verify_results, DriverConfig};

use crate::config::AppConfig;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        memofib_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    run_cli(config)
}

fn run_cli(config: &AppConfig) -> Result<()> {
    let opts = Options::with_delay(config.delay_duration()?);
    let memo = Arc::new(MemoFibonacci::new(opts));
    let calc: Arc<dyn Calculator> = memo.clone();

    let driver_config = DriverConfig {
        max_n: config.max_n,
        num_threads: config.threads,
    };
    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
    if !config.json {
        presenter.present_start(&driver_config);
    }

    let progress = CLIProgressReporter::new(config.quiet || config.json);
    let report = run_concurrent(&calc, &driver_config, &progress)?;

    for failure in &report.failures {
        presenter.present_failure(failure);
    }

    let stats = memo.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        cached = memo.cached_len(),
        "memo cache"
    );

    if config.json {
        println!("{}", report_to_json(&report)?);
    } else {
        presenter.present_results(&report);
        if config.verbose {
            println!(
                "Cache: {} computed, {} hits, {} entries",
                stats.misses,
                stats.hits,
                memo.cached_len()
            );
        }
        presenter.present_summary(&report);
    }

    if config.verify {
        verify_results(&report, &IterativeFibonacci::new())?;
        if !config.json && !config.quiet {
            println!(
                "Verified {} results against the iterative reference.",
                report.results.len()
            );
        }
    }

    Ok(())
}
