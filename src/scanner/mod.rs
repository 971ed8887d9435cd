//! Scanner module - fans probes out across a port set.
//!
//! Every resolved port is scheduled at once; the [`AdmissionGate`] decides
//! how many actually run. Outcomes arrive in completion order and are sorted
//! by port before they are returned.

pub mod gate;
pub mod rate_limiter;
pub mod tcp;
pub mod traits;

use crate::error::{ScanError, ScanResult};
use crate::types::{PortSet, ScanTarget};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

pub use gate::AdmissionGate;
pub use rate_limiter::RateLimiter;
pub use tcp::{Connector, TcpConnectProber, TokioConnector};
pub use traits::{PortProbe, PortScanOutcome, PortStatus};

/// Probe futures kept polled at once. The gate, not this window, is what
/// bounds concurrent connection attempts.
const SCHEDULE_WINDOW: usize = 1000;

/// Configuration for a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Resolved target.
    pub target: ScanTarget,
    /// Ports to probe.
    pub ports: PortSet,
    /// Per-operation timeout (connect, probe write, read, close).
    pub timeout: Duration,
    /// Maximum concurrent probes.
    pub concurrency: usize,
    /// Connection attempts per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Show a progress bar while scanning.
    pub show_progress: bool,
}

impl ScanConfig {
    /// Create a new scan configuration with default tuning.
    pub fn new(target: ScanTarget, ports: PortSet) -> Self {
        Self {
            target,
            ports,
            timeout: Duration::from_millis(1500),
            concurrency: 200,
            rate_limit: 0,
            show_progress: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }
}

/// Complete scan results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub target: String,
    pub ip_address: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub ports_scanned: usize,
    pub open_ports: usize,
    pub closed_ports: usize,
    pub filtered_ports: usize,
    /// One outcome per scanned port, ascending by port.
    pub outcomes: Vec<PortScanOutcome>,
}

impl ScanReport {
    /// Assemble a report from sorted outcomes.
    pub fn new(
        target: &ScanTarget,
        started_at: DateTime<Utc>,
        duration: Duration,
        outcomes: Vec<PortScanOutcome>,
    ) -> Self {
        let count = |status: PortStatus| outcomes.iter().filter(|o| o.status == status).count();

        Self {
            target: target.original.clone(),
            ip_address: target.ip.to_string(),
            started_at,
            duration_ms: duration.as_millis() as u64,
            ports_scanned: outcomes.len(),
            open_ports: count(PortStatus::Open),
            closed_ports: count(PortStatus::Closed),
            filtered_ports: count(PortStatus::Filtered),
            outcomes,
        }
    }

    /// Outcomes for open ports only.
    pub fn open_outcomes(&self) -> impl Iterator<Item = &PortScanOutcome> {
        self.outcomes.iter().filter(|o| o.is_open())
    }
}

/// Execute a complete TCP connect scan.
pub async fn run_scan(config: ScanConfig) -> ScanResult<ScanReport> {
    let started_at = Utc::now();
    let start_time = Instant::now();

    info!(
        host = %config.target,
        ports = config.ports.len(),
        concurrency = config.concurrency,
        timeout_ms = config.timeout.as_millis() as u64,
        "Starting scan"
    );

    let progress = config.show_progress.then(|| progress_bar(config.ports.len()));

    let mut prober = TcpConnectProber::new(config.target.clone(), config.timeout);
    if let Some(limiter) = RateLimiter::new(config.rate_limit) {
        prober = prober.with_rate_limiter(limiter);
    }

    let gate = AdmissionGate::new(config.concurrency);
    let outcomes = scan_ports(&prober, &config.ports, &gate, progress.as_ref()).await?;

    if let Some(pb) = progress {
        pb.finish_with_message("Scan complete");
    }

    let report = ScanReport::new(&config.target, started_at, start_time.elapsed(), outcomes);

    info!(
        open = report.open_ports,
        closed = report.closed_ports,
        filtered = report.filtered_ports,
        duration_ms = report.duration_ms,
        "Scan finished"
    );

    Ok(report)
}

/// Probe every port in `ports` through `gate` and return the outcomes in
/// ascending port order.
///
/// Per-port failures are already folded into each outcome; the only error
/// is a gate that was closed underneath the scan.
pub async fn scan_ports<P>(
    probe: &P,
    ports: &PortSet,
    gate: &AdmissionGate,
    progress: Option<&ProgressBar>,
) -> ScanResult<Vec<PortScanOutcome>>
where
    P: PortProbe + ?Sized,
{
    let window = SCHEDULE_WINDOW.max(gate.capacity());

    let mut outcomes: Vec<PortScanOutcome> = stream::iter(ports.iter())
        .map(|port| async move {
            let _permit = gate.admit().await?;
            let outcome = probe.probe(port).await;

            if let Some(pb) = progress {
                pb.inc(1);
                if outcome.is_open() {
                    pb.set_message(format!("Found open port: {}", port));
                }
            }

            Ok::<_, ScanError>(outcome)
        })
        .buffer_unordered(window)
        .try_collect()
        .await?;

    outcomes.sort_by_key(|o| o.port);
    Ok(outcomes)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_report_counts() {
        let target = ScanTarget::new("localhost", IpAddr::V4(Ipv4Addr::LOCALHOST));
        let p = |n| Port::new(n).unwrap();
        let outcomes = vec![
            PortScanOutcome::open(p(22), Some("ssh".into()), None),
            PortScanOutcome::closed(p(23)),
            PortScanOutcome::filtered(p(25)),
            PortScanOutcome::closed(p(80)),
        ];

        let report = ScanReport::new(&target, Utc::now(), Duration::from_millis(1234), outcomes);
        assert_eq!(report.ports_scanned, 4);
        assert_eq!(report.open_ports, 1);
        assert_eq!(report.closed_ports, 2);
        assert_eq!(report.filtered_ports, 1);
        assert_eq!(report.duration_ms, 1234);
        assert_eq!(report.ip_address, "127.0.0.1");
        assert_eq!(report.open_outcomes().count(), 1);
    }

    #[test]
    fn test_config_builder() {
        let target = ScanTarget::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST));
        let config = ScanConfig::new(target, PortSet::top())
            .with_timeout(Duration::from_secs(2))
            .with_concurrency(10)
            .with_rate_limit(50)
            .with_progress();

        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.rate_limit, 50);
        assert!(config.show_progress);
    }
}
