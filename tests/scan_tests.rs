use async_trait::async_trait;
use lookout::scanner::{
    scan_ports, AdmissionGate, Connector, PortProbe, PortScanOutcome, PortStatus,
    TcpConnectProber,
};
use lookout::services::service_name;
use lookout::types::{Port, PortSet, ScanTarget};
use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn localhost() -> ScanTarget {
    ScanTarget::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn port(n: u16) -> Port {
    Port::new(n).unwrap()
}

/// Accept one connection, optionally wait for a request, then reply and
/// hold the socket until the client closes it.
async fn spawn_peer(reply: &'static [u8], wait_for_request: bool) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 512];
        if wait_for_request {
            let _ = socket.read(&mut buf).await;
        }
        let _ = socket.write_all(reply).await;
        while let Ok(n) = socket.read(&mut buf).await {
            if n == 0 {
                break;
            }
        }
    });

    addr
}

enum Route {
    Refuse,
    Hang,
    Redirect(SocketAddr),
}

/// Routes each requested port to a canned behavior.
struct Scripted(HashMap<u16, Route>);

#[async_trait]
impl Connector for Scripted {
    type Stream = TcpStream;

    async fn connect(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        match self.0.get(&addr.port()) {
            Some(Route::Redirect(to)) => TcpStream::connect(*to).await,
            Some(Route::Hang) => std::future::pending().await,
            Some(Route::Refuse) | None => Err(io::Error::from(io::ErrorKind::ConnectionRefused)),
        }
    }
}

#[tokio::test]
async fn open_port_reports_unsolicited_banner() {
    let addr = spawn_peer(b"SSH-2.0-test\r\n", false).await;
    let prober = TcpConnectProber::new(localhost(), Duration::from_secs(1));

    let outcome = prober.probe(port(addr.port())).await;

    assert_eq!(outcome.status, PortStatus::Open);
    assert_eq!(outcome.banner.as_deref(), Some("SSH-2.0-test"));
    assert_eq!(outcome.service.as_deref(), service_name(addr.port()));
}

#[tokio::test]
async fn released_port_is_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let free = listener.local_addr().unwrap().port();
    drop(listener);

    let prober = TcpConnectProber::new(localhost(), Duration::from_secs(1));
    let outcome = prober.probe(port(free)).await;

    assert_eq!(outcome, PortScanOutcome::closed(port(free)));
}

#[tokio::test]
async fn http_port_sends_head_and_blank_reply_is_no_banner() {
    let peer = spawn_peer(b"\r\n", true).await;
    let connector = Scripted(HashMap::from([(80, Route::Redirect(peer))]));
    let prober =
        TcpConnectProber::with_connector(localhost(), Duration::from_secs(1), connector);

    let outcome = prober.probe(port(80)).await;

    assert_eq!(outcome.status, PortStatus::Open);
    assert_eq!(outcome.service.as_deref(), Some("http"));
    assert_eq!(outcome.banner, None);
}

#[tokio::test]
async fn mail_port_gets_line_break_nudge() {
    // The peer only greets after it receives something.
    let peer = spawn_peer(b"220 mx.example.com ESMTP\r\n", true).await;
    let connector = Scripted(HashMap::from([(25, Route::Redirect(peer))]));
    let prober =
        TcpConnectProber::with_connector(localhost(), Duration::from_secs(1), connector);

    let outcome = prober.probe(port(25)).await;

    assert_eq!(outcome.banner.as_deref(), Some("220 mx.example.com ESMTP"));
    assert_eq!(outcome.service.as_deref(), Some("smtp"));
}

#[tokio::test]
async fn mixed_scan_classifies_every_port_in_order() {
    let ssh = spawn_peer(b"SSH-2.0-mixed\r\n", false).await;
    let connector = Scripted(HashMap::from([
        (22, Route::Redirect(ssh)),
        (23, Route::Refuse),
        (8080, Route::Hang),
    ]));
    let prober =
        TcpConnectProber::with_connector(localhost(), Duration::from_millis(300), connector);
    let ports: PortSet = "8080,23,22,9999".parse().unwrap();
    let gate = AdmissionGate::new(4);

    let outcomes = scan_ports(&prober, &ports, &gate, None).await.unwrap();

    let summary: Vec<(u16, PortStatus)> = outcomes
        .iter()
        .map(|o| (o.port.as_u16(), o.status))
        .collect();
    assert_eq!(
        summary,
        vec![
            (22, PortStatus::Open),
            (23, PortStatus::Closed),
            (8080, PortStatus::Filtered),
            (9999, PortStatus::Closed),
        ]
    );
    assert_eq!(outcomes[0].banner.as_deref(), Some("SSH-2.0-mixed"));
    assert!(outcomes[1..]
        .iter()
        .all(|o| o.service.is_none() && o.banner.is_none()));
}

/// Records how many probes overlap and which ports were seen.
#[derive(Default)]
struct Instrumented {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    seen: Mutex<Vec<u16>>,
}

#[async_trait]
impl PortProbe for Instrumented {
    async fn probe(&self, port: Port) -> PortScanOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(10)).await;
        self.seen.lock().unwrap().push(port.as_u16());

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        PortScanOutcome::closed(port)
    }
}

#[tokio::test]
async fn in_flight_probes_never_exceed_gate_capacity() {
    let probe = Instrumented::default();
    let ports: PortSet = "1-60".parse().unwrap();
    let gate = AdmissionGate::new(5);

    let outcomes = scan_ports(&probe, &ports, &gate, None).await.unwrap();

    assert_eq!(outcomes.len(), 60);
    let peak = probe.peak.load(Ordering::SeqCst);
    assert!(peak <= 5, "peak concurrency was {}", peak);
    assert!(peak >= 1);
    assert_eq!(gate.in_flight(), 0);
}

#[tokio::test]
async fn every_port_is_probed_exactly_once() {
    let probe = Instrumented::default();
    let ports: PortSet = "1-40,30-45".parse().unwrap();
    let gate = AdmissionGate::new(8);

    scan_ports(&probe, &ports, &gate, None).await.unwrap();

    let mut seen = probe.seen.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, (1..=45).collect::<Vec<u16>>());
}

/// Finishes low ports last.
struct ReverseFinisher;

#[async_trait]
impl PortProbe for ReverseFinisher {
    async fn probe(&self, port: Port) -> PortScanOutcome {
        let delay = 5 * u64::from(21 - port.as_u16());
        tokio::time::sleep(Duration::from_millis(delay)).await;
        if port.as_u16() % 2 == 0 {
            PortScanOutcome::open(port, None, None)
        } else {
            PortScanOutcome::filtered(port)
        }
    }
}

#[tokio::test]
async fn outcomes_are_sorted_regardless_of_completion_order() {
    let ports: PortSet = "1-20".parse().unwrap();
    let gate = AdmissionGate::new(20);

    let outcomes = scan_ports(&ReverseFinisher, &ports, &gate, None)
        .await
        .unwrap();

    let order: Vec<u16> = outcomes.iter().map(|o| o.port.as_u16()).collect();
    assert_eq!(order, (1..=20).collect::<Vec<u16>>());
    assert_eq!(outcomes.iter().filter(|o| o.is_open()).count(), 10);
}
