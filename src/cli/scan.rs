//! Scan subcommand implementation.
//!
//! Handles the `lookout scan <target>` command.

use crate::cli::resolve_timeout;
use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use crate::scanner::{run_scan, ScanConfig};
use crate::types::{PortSelection, ScanTarget};
use clap::Parser;
use std::path::PathBuf;

/// Scan a host for open TCP ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Target host or IP address
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (e.g., "80", "80,443", "22,80,8000-8100")
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Start of the range when --ports and --top are not given
    #[arg(long, default_value_t = 1)]
    pub start_port: u32,

    /// End of the range when --ports and --top are not given
    #[arg(long, default_value_t = 1024)]
    pub end_port: u32,

    /// Scan a curated list of commonly open ports
    #[arg(long)]
    pub top: bool,

    /// Per-operation timeout in seconds
    #[arg(short = 't', long)]
    pub timeout: Option<f64>,

    /// Maximum number of simultaneous connection attempts
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub concurrency: Option<u32>,

    /// Connection attempts per second (0 = unlimited)
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write the open ports to a JSON file
    #[arg(long = "json", value_name = "PATH")]
    pub json_output: Option<PathBuf>,
}

impl ScanCommand {
    /// Which ports the flags ask for: an explicit spec, then the curated
    /// list, then the start/end range.
    pub fn port_selection(&self) -> PortSelection {
        if let Some(spec) = &self.ports {
            PortSelection::Spec(spec.clone())
        } else if self.top {
            PortSelection::Top
        } else {
            PortSelection::Range {
                start: self.start_port,
                end: self.end_port,
            }
        }
    }

    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        // Configuration errors abort before anything touches the network.
        let ports = self.port_selection().resolve()?;
        let timeout = resolve_timeout(self.timeout, settings.default_timeout_secs)?;
        let concurrency = self
            .concurrency
            .map(|c| c as usize)
            .unwrap_or(settings.default_concurrency);
        if concurrency == 0 {
            return Err(CliError::InvalidArgument(
                "concurrency must be at least 1".to_string(),
            ));
        }
        let rate_limit = self.rate_limit.unwrap_or(settings.rate_limit);
        let format = self.output.unwrap_or(settings.default_output_format);

        let target = ScanTarget::resolve(&self.target).await?;

        if !quiet && format == OutputFormat::Plain {
            output::print_scan_header(
                &target.original,
                &target.ip.to_string(),
                ports.len(),
                concurrency,
                timeout.as_secs_f64(),
            );
        }

        let mut config = ScanConfig::new(target, ports)
            .with_timeout(timeout)
            .with_concurrency(concurrency)
            .with_rate_limit(rate_limit);
        if verbose && !quiet {
            config = config.with_progress();
        }

        let report = tokio::select! {
            report = run_scan(config) => report?,
            _ = tokio::signal::ctrl_c() => return Err(CliError::Interrupted),
        };

        output::print_report(&report, format)?;

        if let Some(path) = &self.json_output {
            output::write_open_ports(&report, path)?;
            if !quiet && format == OutputFormat::Plain {
                output::print_success(&format!("Saved JSON report to {}", path.display()));
            }
        }

        Ok(())
    }
}
