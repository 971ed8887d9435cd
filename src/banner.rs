//! Banner grabbing for open TCP ports.
//!
//! Two halves: a table-driven selector that decides what (if anything) to
//! write to a freshly opened connection, and a bounded reader that turns the
//! first response bytes into a printable banner.

use crate::services::service_name;
use crate::types::Port;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::trace;

/// Maximum bytes read for a banner.
pub const MAX_BANNER_SIZE: usize = 256;

/// Bare line terminator used to nudge line-oriented services.
const LINE_BREAK: &[u8] = b"\r\n";

/// Services that greet a client after a line terminator.
const LINE_PROTOCOL_SERVICES: &[&str] = &["smtp", "pop3", "imap"];

/// Interactive and remote-access ports that also get a line terminator.
const INTERACTIVE_PORTS: &[u16] = &[22, 23, 3389];

/// What to send on a new connection before reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerProbe {
    /// Minimal `HEAD / HTTP/1.0` request carrying the target host.
    HttpHead,
    /// A bare `\r\n`.
    LineBreak,
    /// Send nothing and wait for an unsolicited banner.
    Passive,
}

impl BannerProbe {
    /// Pick the probe for a port, consulting the services table only for
    /// ports below 1024.
    pub fn for_port(port: Port) -> Self {
        let service = if port.is_privileged() {
            service_name(port.as_u16())
        } else {
            None
        };
        Self::select(port.as_u16(), service)
    }

    /// Pick the probe from a port number and an optional service name.
    pub fn select(port: u16, service: Option<&str>) -> Self {
        if let Some(name) = service {
            if name.contains("http") {
                return Self::HttpHead;
            }
            if LINE_PROTOCOL_SERVICES.contains(&name) {
                return Self::LineBreak;
            }
        }

        if INTERACTIVE_PORTS.contains(&port) {
            Self::LineBreak
        } else {
            Self::Passive
        }
    }

    /// Bytes to write for this probe, if any.
    pub fn payload(self, host: &str) -> Option<Vec<u8>> {
        match self {
            Self::HttpHead => Some(format!("HEAD / HTTP/1.0\r\nHost: {}\r\n\r\n", host).into_bytes()),
            Self::LineBreak => Some(LINE_BREAK.to_vec()),
            Self::Passive => None,
        }
    }
}

/// Send `probe` (if it has a payload) and read the response.
///
/// Both the write and the read are bounded by `budget`. Any failure along
/// the way yields `None`; this never reports an error.
pub async fn grab_banner<S>(
    stream: &mut S,
    probe: BannerProbe,
    host: &str,
    budget: Duration,
) -> Option<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Some(payload) = probe.payload(host) {
        let send = async {
            stream.write_all(&payload).await?;
            stream.flush().await
        };
        match timeout(budget, send).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                trace!("banner probe write failed: {}", e);
                return None;
            }
            Err(_) => {
                trace!("banner probe write timed out");
                return None;
            }
        }
    }

    read_banner(stream, budget).await
}

/// Read up to [`MAX_BANNER_SIZE`] bytes within `budget` and sanitize them.
pub async fn read_banner<S>(stream: &mut S, budget: Duration) -> Option<String>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = [0u8; MAX_BANNER_SIZE];

    match timeout(budget, stream.read(&mut buffer)).await {
        Ok(Ok(n)) => sanitize_banner(&buffer[..n]),
        Ok(Err(e)) => {
            trace!("banner read failed: {}", e);
            None
        }
        Err(_) => {
            trace!("banner read timed out");
            None
        }
    }
}

/// Decode leniently and trim. Undecodable bytes and non-whitespace control
/// characters are dropped; an all-whitespace result is no banner at all.
pub fn sanitize_banner(data: &[u8]) -> Option<String> {
    let text: String = String::from_utf8_lossy(data)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
