//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSet` is the resolved, sorted, duplicate-free list of ports a scan
//! targets, and `PortSelection` describes how the user asked for it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Check if this is a privileged port (< 1024).
    #[inline]
    pub const fn is_privileged(self) -> bool {
        self.0 < 1024
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Configuration error raised while resolving the set of ports to scan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("malformed port specification: '{0}'")]
    MalformedPortSpec(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u64, u64),
    #[error("no valid ports to scan")]
    EmptyPortSet,
}

/// Commonly open TCP ports, scanned when the curated list is selected.
pub const TOP_PORTS: &[u16] = &[
    80, 443, 22, 3389, 21, 23, 25, 53, 110, 143, 465, 587, 993, 995, 8080, 8443,
];

/// An ordered, duplicate-free, non-empty set of ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortSet(Vec<Port>);

impl PortSet {
    /// Build a set from raw values, dropping anything outside 1-65535.
    ///
    /// Fails with [`PortError::EmptyPortSet`] when nothing survives the filter.
    pub fn from_values<I>(values: I) -> Result<Self, PortError>
    where
        I: IntoIterator<Item = u64>,
    {
        let ports: BTreeSet<Port> = values
            .into_iter()
            .filter_map(|v| u16::try_from(v).ok())
            .filter_map(Port::new)
            .collect();

        if ports.is_empty() {
            return Err(PortError::EmptyPortSet);
        }

        Ok(Self(ports.into_iter().collect()))
    }

    /// The curated list of commonly open ports.
    pub fn top() -> Self {
        Self(sorted_unique(TOP_PORTS.iter().filter_map(|&p| Port::new(p))))
    }

    /// Number of ports in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a successfully resolved set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, port: u16) -> bool {
        Port::new(port).is_some_and(|p| self.0.binary_search(&p).is_ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.0.iter().copied()
    }
}

impl FromStr for PortSet {
    type Err = PortError;

    /// Parse a specification such as `"22,80,8000-8100"`.
    ///
    /// Each comma-separated token is a single integer or an inclusive
    /// `start-end` range. Blank tokens are skipped. Values outside the valid
    /// port domain are dropped; a token that is neither form aborts parsing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values: Vec<u64> = Vec::new();

        for raw in s.split(',') {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }

            if let Some((a, b)) = token.split_once('-') {
                let malformed = || PortError::MalformedPortSpec(token.to_string());
                let start = parse_integer(a.trim()).ok_or_else(malformed)?;
                let end = parse_integer(b.trim()).ok_or_else(malformed)?;
                if start > end {
                    return Err(PortError::InvalidRange(start, end));
                }
                // Nothing above MAX survives the filter, so don't expand it.
                let upper = end.min(u64::from(Port::MAX));
                if start <= upper {
                    values.extend(start..=upper);
                }
            } else {
                let port = parse_integer(token)
                    .ok_or_else(|| PortError::MalformedPortSpec(token.to_string()))?;
                values.push(port);
            }
        }

        Self::from_values(values)
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Port::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// How the caller asked for the ports to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSelection {
    /// A comma-separated specification of ports and ranges.
    Spec(String),
    /// The fixed curated list in [`TOP_PORTS`].
    Top,
    /// Explicit inclusive bounds.
    Range { start: u32, end: u32 },
}

impl PortSelection {
    /// Expand the selection into a [`PortSet`].
    pub fn resolve(&self) -> Result<PortSet, PortError> {
        match self {
            Self::Spec(spec) => spec.parse(),
            Self::Top => Ok(PortSet::top()),
            Self::Range { start, end } => {
                let upper = (*end).min(u32::from(Port::MAX));
                PortSet::from_values((*start..=upper).map(u64::from))
            }
        }
    }
}

impl Default for PortSelection {
    fn default() -> Self {
        Self::Range { start: 1, end: 1024 }
    }
}

fn sorted_unique(ports: impl Iterator<Item = Port>) -> Vec<Port> {
    ports.collect::<BTreeSet<_>>().into_iter().collect()
}

/// Parse a run of ASCII digits. Overlong values saturate so they are
/// filtered as out of range instead of being reported as malformed.
fn parse_integer(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse().unwrap_or(u64::MAX))
}
