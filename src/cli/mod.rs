//! CLI subcommand definitions and handlers.
//!
//! - `lookout scan <target>` - Scan a host's TCP ports
//! - `lookout headers <target> <port>` - Fetch HTTP/HTTPS response headers

mod headers;
mod scan;

pub use headers::HeadersCommand;
pub use scan::ScanCommand;

use crate::config::{seconds_to_duration, AppSettings};
use crate::error::{CliError, CliResult};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// lookout - async TCP port scanner and service header enumerator.
#[derive(Parser, Debug)]
#[command(name = "lookout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Async TCP port scanner with banner grabbing", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logs and a progress bar)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, global = true, value_name = "PATH", env = "LOOKOUT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a host for open TCP ports
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Fetch response headers from one HTTP or HTTPS port
    #[command(alias = "h")]
    Headers(HeadersCommand),
}

impl Cli {
    /// Load settings and dispatch to the selected subcommand.
    pub async fn execute(&self) -> CliResult<()> {
        let settings = AppSettings::load(self.config.as_deref())?;

        match &self.command {
            Commands::Scan(cmd) => cmd.execute(&settings, self.verbose, self.quiet).await,
            Commands::Headers(cmd) => cmd.execute(&settings, self.quiet).await,
        }
    }
}

/// Pick the flag value if given, else the configured default, and validate.
pub(crate) fn resolve_timeout(flag: Option<f64>, default_secs: f64) -> CliResult<Duration> {
    let secs = flag.unwrap_or(default_secs);
    seconds_to_duration(secs).ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "timeout must be a positive number of seconds, got {}",
            secs
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_timeout() {
        assert_eq!(
            resolve_timeout(None, 1.5).unwrap(),
            Duration::from_millis(1500)
        );
        assert_eq!(
            resolve_timeout(Some(0.25), 1.5).unwrap(),
            Duration::from_millis(250)
        );
        assert!(matches!(
            resolve_timeout(Some(0.0), 1.5),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(resolve_timeout(Some(-3.0), 1.5).is_err());
    }

    #[test]
    fn test_parse_scan_command() {
        let cli = Cli::try_parse_from([
            "lookout", "-v", "scan", "example.com", "--ports", "22,80", "-c", "50", "--timeout",
            "0.5",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Scan(cmd) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(cmd.target, "example.com");
        assert_eq!(cmd.ports.as_deref(), Some("22,80"));
        assert_eq!(cmd.concurrency, Some(50));
        assert_eq!(cmd.timeout, Some(0.5));
    }

    #[test]
    fn test_parse_headers_command() {
        let cli = Cli::try_parse_from(["lookout", "headers", "example.com", "8443", "--plain"])
            .unwrap();
        let Commands::Headers(cmd) = cli.command else {
            panic!("expected headers");
        };
        assert_eq!(cmd.port, 8443);
        assert!(cmd.plain);
        assert!(!cmd.tls);
    }

    #[test]
    fn test_headers_transport_flags_conflict() {
        assert!(
            Cli::try_parse_from(["lookout", "headers", "h", "443", "--tls", "--plain"]).is_err()
        );
    }

    #[test]
    fn test_headers_port_zero_rejected() {
        assert!(Cli::try_parse_from(["lookout", "headers", "h", "0"]).is_err());
    }
}
