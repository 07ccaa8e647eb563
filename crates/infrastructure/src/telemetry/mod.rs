//! Tracing subscriber setup
//!
//! Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
//! wins over everything else; otherwise an explicit override (e.g. from
//! `-v` flags) wins over the configured level.

use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(
    config: &LoggingConfig,
    override_level: Option<&str>,
) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config, override_level)));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
}

fn filter_directive(config: &LoggingConfig, override_level: Option<&str>) -> String {
    override_level
        .filter(|level| !level.trim().is_empty())
        .unwrap_or(&config.level)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_used_by_default() {
        let config = LoggingConfig::default();
        assert_eq!(filter_directive(&config, None), "warn");
    }

    #[test]
    fn test_override_wins() {
        let config = LoggingConfig::default();
        assert_eq!(filter_directive(&config, Some("debug")), "debug");
        assert_eq!(filter_directive(&config, Some("  ")), "warn");
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::for_testing();
        let _ = init_tracing(&config, None);
        assert!(init_tracing(&config, None).is_err());
    }
}
