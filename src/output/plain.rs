//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::enumerator::{ServiceHeaders, INTERESTING_HEADERS};
use crate::scanner::{PortScanOutcome, PortStatus, ScanReport};
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "════════════════════════════════════════════════";

/// Print results in human-readable plain text format.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for outcome in &report.outcomes {
        let status_style = match outcome.status {
            PortStatus::Open => Style::new().green().bold(),
            PortStatus::Closed => Style::new().red(),
            PortStatus::Filtered => Style::new().yellow(),
        };
        writeln!(out, "{}", status_style.apply_to(format_outcome(outcome)))?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} {}",
        style("Open ports:").bold(),
        style(report.open_ports).green().bold()
    )?;
    writeln!(
        out,
        "{} {} ports in {:.2}s ({} closed, {} filtered)",
        style("Scanned").dim(),
        report.ports_scanned,
        report.duration_ms as f64 / 1000.0,
        style(report.closed_ports).red(),
        style(report.filtered_ports).yellow()
    )?;

    Ok(())
}

/// Render one outcome as `STATUS    PORT  SERVICE | banner`.
///
/// Multi-line banners are folded onto one line.
pub fn format_outcome(outcome: &PortScanOutcome) -> String {
    let status = outcome.status.to_string().to_uppercase();
    let service = outcome.service.as_deref().unwrap_or("unknown");
    let mut line = format!("{:<9} {:<5} {}", status, outcome.port.as_u16(), service);

    if let Some(banner) = &outcome.banner {
        let folded: Vec<&str> = banner
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        line.push_str(" | ");
        line.push_str(&folded.join(" "));
    }

    line
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, ip: &str, ports: usize, concurrency: usize, timeout_secs: f64) {
    println!();
    println!("{}", style(format!("╔{}", RULE)).cyan());
    println!(
        "{} {} | Target: {} ({})",
        style("║").cyan(),
        style("lookout").cyan().bold(),
        style(target).white().bold(),
        ip
    );
    println!("{}", style(format!("╚{}", RULE)).cyan());
    println!(
        "Scanning {} ports with concurrency={} and timeout={}s",
        style(ports).white().bold(),
        concurrency,
        timeout_secs
    );
    println!();
}

/// Print the result of a header probe.
///
/// Only the well-known identifying headers are shown unless `all` is set.
pub fn print_headers(result: &ServiceHeaders, all: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{} {}", style("Service:").bold(), result.transport)?;

    if result.headers.is_empty() {
        writeln!(out, "{}", style("(No headers received)").dim())?;
        return Ok(());
    }

    if all {
        for (name, value) in &result.headers {
            writeln!(out, "{}: {}", style(name).cyan(), value)?;
        }
    } else {
        for name in INTERESTING_HEADERS {
            if let Some(value) = result.headers.get(*name) {
                writeln!(out, "{}: {}", style(name).cyan(), value)?;
            }
        }
    }

    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;

    #[test]
    fn test_format_open_with_banner() {
        let outcome = PortScanOutcome::open(
            Port::new(22).unwrap(),
            Some("ssh".into()),
            Some("SSH-2.0-OpenSSH_9.6".into()),
        );
        assert_eq!(
            format_outcome(&outcome),
            "OPEN      22    ssh | SSH-2.0-OpenSSH_9.6"
        );
    }

    #[test]
    fn test_format_closed_unknown_service() {
        let outcome = PortScanOutcome::closed(Port::new(12345).unwrap());
        assert_eq!(format_outcome(&outcome), "CLOSED    12345 unknown");
    }

    #[test]
    fn test_format_folds_multiline_banner() {
        let outcome = PortScanOutcome::open(
            Port::new(80).unwrap(),
            Some("http".into()),
            Some("HTTP/1.0 200 OK\r\nServer: nginx".into()),
        );
        assert!(format_outcome(&outcome).ends_with("| HTTP/1.0 200 OK Server: nginx"));
    }
}
