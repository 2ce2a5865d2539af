//! UI helpers for CLI display.

use console::style;

/// Print a styled section header.
pub fn print_header(text: &str) {
    println!("{}", style(format!("--- {text} ---")).bold().cyan());
}

/// Print a success message.
pub fn print_success(text: &str) {
    println!("{}", style(text).green().bold());
}

/// Print an error message.
pub fn print_error(text: &str) {
    eprintln!("{} {text}", style("[ERROR]").for_stderr().red().bold());
}
