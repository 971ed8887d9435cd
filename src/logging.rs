//! Logging configuration using tracing.
//!
//! Logs go to stderr so stdout stays parseable for JSON and CSV output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Include target (module path)
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: String::from("warn"),
            with_target: false,
        }
    }
}

impl LogConfig {
    /// Pick the level from the global CLI flags. `quiet` wins over `verbose`.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        let level = if quiet {
            "error"
        } else if verbose {
            "debug"
        } else {
            "warn"
        };

        Self {
            level: level.to_string(),
            with_target: verbose,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init_logging(config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
