//! TCP Connect prober.
//!
//! Classifies a port by completing (or failing to complete) a full TCP
//! handshake within a timeout, then grabs a banner from open ports. Does not
//! require elevated privileges.

use crate::banner::{grab_banner, BannerProbe};
use crate::error::{ScanError, ScanResult};
use crate::scanner::rate_limiter::RateLimiter;
use crate::scanner::traits::{PortProbe, PortScanOutcome};
use crate::services::service_name;
use crate::types::{Port, ScanTarget};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Opens the transport for a probe.
///
/// The production implementation is [`TokioConnector`]; tests substitute
/// peers that refuse, hang, or redirect.
#[async_trait]
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn connect(&self, addr: SocketAddr) -> io::Result<Self::Stream>;
}

/// Plain OS-level TCP connect.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioConnector;

#[async_trait]
impl Connector for TokioConnector {
    type Stream = TcpStream;

    async fn connect(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        TcpStream::connect(addr).await
    }
}

/// TCP Connect prober.
///
/// One call to [`PortProbe::probe`] is exactly one connection attempt. The
/// same timeout bounds the connect, the banner probe write, the banner read,
/// and the close.
pub struct TcpConnectProber<C = TokioConnector> {
    target: ScanTarget,
    timeout: Duration,
    connector: C,
    rate_limiter: Option<RateLimiter>,
}

impl TcpConnectProber<TokioConnector> {
    /// Create a prober for `target` using real TCP sockets.
    pub fn new(target: ScanTarget, timeout: Duration) -> Self {
        Self::with_connector(target, timeout, TokioConnector)
    }
}

impl<C: Connector> TcpConnectProber<C> {
    /// Create a prober with a custom connector.
    pub fn with_connector(target: ScanTarget, timeout: Duration, connector: C) -> Self {
        Self {
            target,
            timeout,
            connector,
            rate_limiter: None,
        }
    }

    /// Pace connection attempts through `limiter`.
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Attempt to connect to the target address.
    async fn attempt_connect(&self, addr: SocketAddr) -> ScanResult<C::Stream> {
        match timeout(self.timeout, self.connector.connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => {
                Err(ScanError::ConnectionRefused)
            }
            // The kernel gave up on the handshake before our timer did.
            Ok(Err(e)) if e.kind() == io::ErrorKind::TimedOut => Err(ScanError::Timeout),
            Ok(Err(e)) => Err(ScanError::ConnectionFailed {
                port: addr.port(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ScanError::Timeout),
        }
    }
}

#[async_trait]
impl<C: Connector> PortProbe for TcpConnectProber<C> {
    async fn probe(&self, port: Port) -> PortScanOutcome {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let addr = SocketAddr::new(self.target.ip, port.as_u16());

        match self.attempt_connect(addr).await {
            Ok(mut stream) => {
                debug!("Port {} is open", addr);
                let probe = BannerProbe::for_port(port);
                let banner = grab_banner(&mut stream, probe, &self.target.original, self.timeout).await;

                // Graceful close; give up if the peer stalls it.
                if timeout(self.timeout, stream.shutdown()).await.is_err() {
                    trace!("Close of {} timed out", addr);
                }

                let service = service_name(port.as_u16()).map(str::to_string);
                PortScanOutcome::open(port, service, banner)
            }
            Err(ScanError::Timeout) => {
                trace!("Port {} timed out (filtered)", addr);
                PortScanOutcome::filtered(port)
            }
            Err(e) => {
                trace!("Port {} closed: {}", addr, e);
                PortScanOutcome::closed(port)
            }
        }
    }
}
