//! Logging and tracing configuration
//!
//! All diagnostics go to stderr so stdout carries nothing but the report.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count to a default filter directive
///
/// 0 shows warnings only, 1 adds progress markers and verdicts,
/// 2 or more adds command lines and raw tool output.
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "fragcheck=warn,warn",
        1 => "fragcheck=info,warn",
        _ => "fragcheck=debug,info",
    }
}

/// Initialize tracing for the CLI (stderr logging)
///
/// `RUST_LOG` takes precedence over the verbosity flag. With `no_color`
/// the log lines carry no ANSI escapes.
pub fn init_cli(verbosity: u8, no_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!no_color)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert!(filter_for_verbosity(0).contains("fragcheck=warn"));
        assert!(filter_for_verbosity(1).contains("fragcheck=info"));
        assert!(filter_for_verbosity(2).contains("fragcheck=debug"));
        assert_eq!(filter_for_verbosity(7), filter_for_verbosity(2));
    }
}
