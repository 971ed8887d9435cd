//! # lookout - Async TCP Port Scanner and Service Header Enumerator
//!
//! lookout probes a single host for open TCP ports, grabs a short banner
//! from each open one, and can fetch identifying HTTP/HTTPS response
//! headers from a chosen port.
//!
//! ## Features
//!
//! - **Port Specs**: Comma-separated ports and ranges (`22,80,8000-8100`)
//! - **Bounded Concurrency**: A semaphore caps simultaneous connection attempts
//! - **Classification**: Every port is reported as open, closed or filtered
//! - **Banner Grabbing**: Protocol-aware nudges for HTTP, mail and shell services
//! - **Header Enumeration**: `HEAD /` over plain TCP or TLS
//! - **Multiple Output Formats**: Plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use lookout::scanner::{run_scan, ScanConfig};
//! use lookout::types::{PortSet, ScanTarget};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let target = ScanTarget::resolve("127.0.0.1").await?;
//!     let ports: PortSet = "22,80,443".parse()?;
//!
//!     let report = run_scan(ScanConfig::new(target, ports)).await?;
//!     for outcome in report.open_outcomes() {
//!         println!("{} {:?}", outcome.port, outcome.banner);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Port, port set and target types
//! - [`scanner`] - Connection prober, admission gate and scan orchestration
//! - [`banner`] - Banner probe selection and response reading
//! - [`enumerator`] - HTTP/HTTPS header probe
//! - [`config`] - Settings file handling
//! - [`output`] - Output formatting
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use enumerator::{HeaderProber, ServiceHeaders, Transport};
pub use error::{CliError, ProbeError, ScanError};
pub use scanner::{
    run_scan, scan_ports, AdmissionGate, PortProbe, PortScanOutcome, PortStatus, ScanConfig,
    ScanReport, TcpConnectProber,
};
pub use types::{Port, PortSelection, PortSet, ScanTarget};
