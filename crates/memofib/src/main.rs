//! MemoFib: concurrent memoized Fibonacci on a bounded worker pool.

use anyhow::Result;
use memofib_core::calculator::FibError;
use memofib_lib::{app, config, errors};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    // Parse CLI args and run
    let config = config::AppConfig::parse();
    match app::run(&config) {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<FibError>() {
            Some(fib_err) => {
                memofib_cli::ui::print_error(&fib_err.to_string());
                std::process::exit(errors::handle_error(fib_err));
            }
            None => Err(err),
        },
    }
}
