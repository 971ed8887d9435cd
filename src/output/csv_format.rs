//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Print results in CSV format.
pub fn print_csv(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(report, stdout.lock())
}

/// Write one row per outcome to `writer`.
pub fn write_csv<W: Write>(report: &ScanReport, writer: W) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["port", "status", "service", "banner"])?;

    for outcome in &report.outcomes {
        wtr.write_record([
            outcome.port.to_string().as_str(),
            outcome.status.to_string().as_str(),
            outcome.service.as_deref().unwrap_or(""),
            outcome.banner.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::PortScanOutcome;
    use crate::types::{Port, ScanTarget};
    use chrono::Utc;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    #[test]
    fn test_write_csv() {
        let target = ScanTarget::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST));
        let outcomes = vec![
            PortScanOutcome::open(Port::new(25).unwrap(), Some("smtp".into()), Some("220 mx, ready".into())),
            PortScanOutcome::closed(Port::new(26).unwrap()),
        ];
        let report = ScanReport::new(&target, Utc::now(), Duration::ZERO, outcomes);

        let mut buf = Vec::new();
        write_csv(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "port,status,service,banner\n25,open,smtp,\"220 mx, ready\"\n26,closed,,\n"
        );
    }
}
