//! MemoFib library: application logic for the `memofib` binary.

pub mod app;
pub mod config;
pub mod errors;
