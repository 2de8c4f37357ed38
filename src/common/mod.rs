//! Common utilities shared by the checker and its binaries

pub mod config;
pub mod error;
pub mod logging;

pub use config::CheckerConfig;
pub use error::{Error, Result};

/// Render an argument vector as a single shell-like line for logs and reports
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(" ")
}
