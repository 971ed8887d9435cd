//! HTTP/HTTPS header enumeration for a single target port.
//!
//! Sends one `HEAD /` request over plaintext TCP or TLS and parses the
//! response headers. A failure at any step (resolve, connect, handshake,
//! write, read) is returned as a single [`ProbeError`]; there is no retry and
//! no fallback between transports.

use crate::error::{ProbeError, ProbeResult};
use crate::types::ScanTarget;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_native_tls::TlsConnector;
use tracing::debug;

/// Header name to value. Duplicate names keep the last value seen.
pub type HeaderMap = BTreeMap<String, String>;

/// Bytes read from the server in the single response read.
pub const READ_BUFFER_SIZE: usize = 4096;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("lookout/", env!("CARGO_PKG_VERSION"));

/// Ports that default to TLS.
const TLS_PORTS: &[u16] = &[443, 8443];

/// Headers worth showing by default.
pub const INTERESTING_HEADERS: &[&str] = &["Server", "X-Powered-By", "Via", "Date"];

/// Transport used for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    #[serde(rename = "HTTP")]
    Plain,
    #[serde(rename = "HTTPS")]
    Tls,
}

impl Transport {
    /// TLS for 443 and 8443, plaintext everywhere else.
    pub fn for_port(port: u16) -> Self {
        if TLS_PORTS.contains(&port) {
            Self::Tls
        } else {
            Self::Plain
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Plain => "HTTP",
            Self::Tls => "HTTPS",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Headers returned by one probe, tagged with the transport used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHeaders {
    pub transport: Transport,
    pub headers: HeaderMap,
}

/// Single-shot header prober.
#[derive(Debug, Clone)]
pub struct HeaderProber {
    host: String,
    port: u16,
    transport: Transport,
    timeout: Duration,
}

impl HeaderProber {
    /// Create a prober for `host:port`, picking the transport from the port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            transport: Transport::for_port(port),
            timeout: Duration::from_secs(2),
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Run the request/response cycle and parse the headers.
    pub async fn probe(&self) -> ProbeResult<ServiceHeaders> {
        let target = ScanTarget::resolve(&self.host).await?;
        let addr = SocketAddr::new(target.ip, self.port);

        debug!("Probing {} over {}", addr, self.transport);

        let mut tcp = match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(ProbeError::Connect {
                    addr: addr.to_string(),
                    source,
                })
            }
            Err(_) => return Err(ProbeError::TimedOut { stage: "connect" }),
        };

        let raw = match self.transport {
            Transport::Plain => exchange(&mut tcp, &target.original, self.timeout).await?,
            Transport::Tls => {
                let connector = TlsConnector::from(native_tls::TlsConnector::new()?);
                let mut tls = within(
                    "TLS handshake",
                    self.timeout,
                    connector.connect(&target.original, tcp),
                )
                .await?;
                exchange(&mut tls, &target.original, self.timeout).await?
            }
        };

        Ok(ServiceHeaders {
            transport: self.transport,
            headers: parse_headers(&raw),
        })
    }
}

/// Build the `HEAD /` request sent to `host`.
pub fn build_request(host: &str) -> String {
    format!(
        "HEAD / HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\nConnection: close\r\n\r\n",
        host, USER_AGENT
    )
}

/// Write the request and perform one bounded read of the response.
pub async fn exchange<S>(stream: &mut S, host: &str, budget: Duration) -> ProbeResult<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = build_request(host);
    within("write", budget, async {
        stream.write_all(request.as_bytes()).await?;
        stream.flush().await
    })
    .await?;

    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let n = within("read", budget, stream.read(&mut buffer)).await?;

    Ok(String::from_utf8_lossy(&buffer[..n]).into_owned())
}

/// Parse response headers.
///
/// The status line is skipped. Each following line up to the first blank
/// line is split on its first colon with both halves trimmed; lines without
/// a colon are ignored. The body is never parsed.
pub fn parse_headers(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for line in raw.lines().skip(1) {
        if line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    headers
}

async fn within<T, E, F>(stage: &'static str, budget: Duration, fut: F) -> ProbeResult<T>
where
    F: Future<Output = Result<T, E>>,
    ProbeError: From<E>,
{
    match timeout(budget, fut).await {
        Ok(result) => result.map_err(ProbeError::from),
        Err(_) => Err(ProbeError::TimedOut { stage }),
    }
}
