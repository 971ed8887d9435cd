//! JSON output formatting.

use crate::scanner::{PortScanOutcome, ScanReport};
use std::fs;
use std::io;
use std::path::Path;

/// Print the full report in JSON format.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

/// Write the open outcomes, and only those, as a pretty JSON array.
pub fn write_open_ports(report: &ScanReport, path: &Path) -> io::Result<()> {
    let open: Vec<&PortScanOutcome> = report.open_outcomes().collect();
    let json = serde_json::to_string_pretty(&open).map_err(io::Error::other)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Port, ScanTarget};
    use chrono::Utc;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_write_open_ports_only() {
        let target = ScanTarget::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST));
        let outcomes = vec![
            PortScanOutcome::open(Port::new(22).unwrap(), Some("ssh".into()), Some("SSH-2.0-x".into())),
            PortScanOutcome::closed(Port::new(23).unwrap()),
            PortScanOutcome::filtered(Port::new(25).unwrap()),
            PortScanOutcome::open(Port::new(8080).unwrap(), Some("http-alt".into()), None),
        ];
        let report = ScanReport::new(&target, Utc::now(), Duration::from_millis(10), outcomes);

        let dir = tempdir().unwrap();
        let path = dir.path().join("open.json");
        write_open_ports(&report, &path).unwrap();

        let written: Vec<PortScanOutcome> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(PortScanOutcome::is_open));
        assert_eq!(written[0].banner.as_deref(), Some("SSH-2.0-x"));
        assert_eq!(written[1].port.as_u16(), 8080);
    }
}
