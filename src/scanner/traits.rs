//! Scanner trait abstraction.
//!
//! Defines the outcome types and the per-port probing seam the orchestrator
//! fans out over.

use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a scanned port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// The connection was accepted.
    Open,
    /// The connection was actively refused or failed at the OS level.
    Closed,
    /// The connection attempt timed out.
    Filtered,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
        }
    }
}

/// Result of probing a single port.
///
/// `service` and `banner` are only ever set on open ports; the constructors
/// are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortScanOutcome {
    pub port: Port,
    pub status: PortStatus,
    pub service: Option<String>,
    pub banner: Option<String>,
}

impl PortScanOutcome {
    pub fn open(port: Port, service: Option<String>, banner: Option<String>) -> Self {
        Self {
            port,
            status: PortStatus::Open,
            service,
            banner,
        }
    }

    pub fn closed(port: Port) -> Self {
        Self::bare(port, PortStatus::Closed)
    }

    pub fn filtered(port: Port) -> Self {
        Self::bare(port, PortStatus::Filtered)
    }

    fn bare(port: Port, status: PortStatus) -> Self {
        Self {
            port,
            status,
            service: None,
            banner: None,
        }
    }

    /// Check if the port is open.
    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// One unit of probing work: classify a single port.
///
/// Implementations must not fail; every port maps to exactly one outcome.
#[async_trait]
pub trait PortProbe: Send + Sync {
    async fn probe(&self, port: Port) -> PortScanOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_status_display() {
        assert_eq!(PortStatus::Open.to_string(), "open");
        assert_eq!(PortStatus::Closed.to_string(), "closed");
        assert_eq!(PortStatus::Filtered.to_string(), "filtered");
    }

    #[test]
    fn test_outcome_constructors() {
        let port = Port::new(22).unwrap();
        let open = PortScanOutcome::open(port, Some("ssh".into()), Some("SSH-2.0".into()));
        assert!(open.is_open());
        assert_eq!(open.banner.as_deref(), Some("SSH-2.0"));

        let closed = PortScanOutcome::closed(port);
        assert_eq!(closed.status, PortStatus::Closed);
        assert!(closed.service.is_none() && closed.banner.is_none());

        let filtered = PortScanOutcome::filtered(port);
        assert_eq!(filtered.status, PortStatus::Filtered);
        assert!(!filtered.is_open());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = PortScanOutcome::open(Port::new(80).unwrap(), Some("http".into()), None);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"port": 80, "status": "open", "service": "http", "banner": null})
        );
    }
}
