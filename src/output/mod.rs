//! Output formatting module.
//!
//! Reporters consume the scanner's outcome values: a styled plain-text table,
//! JSON and CSV on stdout, a JSON file of open ports, and the header report
//! for the enumeration command.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_csv, write_csv};
pub use json_format::{print_json, write_open_ports};
pub use plain::{
    format_outcome, print_error, print_headers, print_info, print_plain, print_scan_header,
    print_success,
};

use crate::scanner::ScanReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Format and print a scan report according to the specified format.
pub fn print_report(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(report),
        OutputFormat::Json => print_json(report),
        OutputFormat::Csv => print_csv(report),
    }
}
