//! Tracing subscriber setup for the command-line tool.
//!
//! Logs go to stderr; stdout carries playlist text and listings only.

use tracing_subscriber::{
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Filter directive used when `RUST_LOG` is not set
pub fn default_filter(log_level: &str) -> String {
    format!("m3u_filter={}", log_level)
}

/// Install the global subscriber. `RUST_LOG` overrides `log_level`.
///
/// Fails if a global subscriber is already installed.
pub fn init(log_level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter("debug"), "m3u_filter=debug");
    }

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        let _ = init("warn");
        assert!(init("warn").is_err());
    }
}
