//! Target resolution.
//!
//! A scan runs against exactly one host. The host may be an IP literal or a
//! hostname; hostnames are resolved with the system-configured DNS servers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tokio::net::lookup_host;
use tracing::debug;
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ScanTarget {
    /// Create a new scan target.
    pub fn new(original: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }

    /// Resolve a host string to a target.
    ///
    /// IP literals are used as-is. Hostnames go through the resolver built
    /// from the system configuration (`/etc/resolv.conf` and the hosts
    /// file); if that fails, the platform resolver (`getaddrinfo`) gets a
    /// try. The first returned address wins.
    pub async fn resolve(host: &str) -> Result<Self, TargetError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(TargetError::InvalidFormat(host.to_string()));
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(Self::new(host, ip));
        }

        // Accept bracketed IPv6 literals as typed in URLs.
        if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            if let Ok(ip) = inner.parse::<IpAddr>() {
                return Ok(Self::new(inner, ip));
            }
        }

        let dns_error = match lookup_system_dns(host).await {
            Ok(Some(ip)) => return Ok(Self::new(host, ip)),
            Ok(None) => None,
            Err(e) => {
                debug!("DNS lookup of {} failed, trying getaddrinfo: {}", host, e);
                Some(e)
            }
        };

        match lookup_host((host, 0)).await {
            Ok(mut addrs) => match addrs.next() {
                Some(addr) => Ok(Self::new(host, addr.ip())),
                None => Err(TargetError::NoAddressesFound(host.to_string())),
            },
            Err(e) => Err(TargetError::DnsResolutionFailed(
                host.to_string(),
                dns_error.unwrap_or_else(|| e.to_string()),
            )),
        }
    }
}

/// First address from the system-configured DNS resolver.
async fn lookup_system_dns(host: &str) -> Result<Option<IpAddr>, String> {
    let resolver = TokioAsyncResolver::tokio_from_system_conf().map_err(|e| e.to_string())?;
    let response = resolver.lookup_ip(host).await.map_err(|e| e.to_string())?;
    Ok(response.iter().next())
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Error type for target resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target: '{0}'")]
    InvalidFormat(String),
    #[error("failed to resolve hostname '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
}
