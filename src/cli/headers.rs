//! Headers subcommand implementation.
//!
//! Handles the `lookout headers <target> <port>` command.

use crate::cli::resolve_timeout;
use crate::config::AppSettings;
use crate::enumerator::{HeaderProber, Transport};
use crate::error::CliResult;
use crate::output;
use clap::Parser;

/// Fetch response headers from one HTTP or HTTPS port.
#[derive(Parser, Debug)]
pub struct HeadersCommand {
    /// Target host or IP address
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Target port (e.g., 80 or 443)
    #[arg(value_name = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Force TLS regardless of port
    #[arg(long, conflicts_with = "plain")]
    pub tls: bool,

    /// Force plaintext regardless of port
    #[arg(long)]
    pub plain: bool,

    /// Timeout in seconds for each step
    #[arg(short = 't', long)]
    pub timeout: Option<f64>,

    /// Print every header instead of the identifying ones
    #[arg(short, long)]
    pub all: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl HeadersCommand {
    /// Transport from the flags, falling back to the port convention.
    pub fn transport(&self) -> Transport {
        if self.tls {
            Transport::Tls
        } else if self.plain {
            Transport::Plain
        } else {
            Transport::for_port(self.port)
        }
    }

    /// Execute the headers command.
    pub async fn execute(&self, settings: &AppSettings, quiet: bool) -> CliResult<()> {
        let timeout = resolve_timeout(self.timeout, settings.header_timeout_secs)?;

        let prober = HeaderProber::new(&self.target, self.port)
            .with_transport(self.transport())
            .with_timeout(timeout);

        let result = prober.probe().await?;

        if self.json {
            let json = serde_json::to_string_pretty(&result).map_err(std::io::Error::other)?;
            println!("{}", json);
        } else {
            if !quiet {
                output::print_info(&format!("{}:{}", self.target, self.port));
            }
            output::print_headers(&result, self.all)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> HeadersCommand {
        let mut full = vec!["headers"];
        full.extend_from_slice(args);
        HeadersCommand::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_transport_selection() {
        assert_eq!(command(&["h", "443"]).transport(), Transport::Tls);
        assert_eq!(command(&["h", "80"]).transport(), Transport::Plain);
        assert_eq!(command(&["h", "80", "--tls"]).transport(), Transport::Tls);
        assert_eq!(command(&["h", "8443", "--plain"]).transport(), Transport::Plain);
    }
}
