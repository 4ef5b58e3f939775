use std::collections::BTreeMap;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout_at};

use crate::candidate::Candidate;
use crate::probe::{Outcome, Probe, ProbeMeta, TimeoutPolicy, unsupported};

/// TCP connect probe. A completed handshake means the port is open; the
/// connection is shut down right away without exchanging data.
pub struct TcpConnectProbe {
    ip: IpAddr,
    services: Arc<BTreeMap<u16, String>>,
}

impl TcpConnectProbe {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            services: Arc::new(BTreeMap::new()),
        }
    }
    /// Attach a port → service name table used to label open ports.
    pub fn with_services(mut self, services: BTreeMap<u16, String>) -> Self {
        self.services = Arc::new(services);
        self
    }
}

/// Map a connect error to an outcome. Errors the target caused mean closed
/// or filtered; anything local (fd exhaustion, no source address) is an error.
fn classify_connect_error(addr: SocketAddr, e: &io::Error) -> Outcome {
    match e.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::TimedOut
        | io::ErrorKind::HostUnreachable
        | io::ErrorKind::NetworkUnreachable => Outcome::Dead(None),
        _ => Outcome::error(format!("connect {}: {}", addr, e)),
    }
}

#[async_trait]
impl Probe for TcpConnectProbe {
    fn name(&self) -> &'static str {
        "tcp"
    }

    fn timeout_policy(&self) -> TimeoutPolicy {
        TimeoutPolicy::Dead
    }

    async fn probe(&self, candidate: &Candidate, deadline: Instant) -> Outcome {
        let Some(port) = candidate.port() else {
            return unsupported(self.name(), candidate);
        };
        let socket_addr = SocketAddr::new(self.ip, port);
        let start = Instant::now();
        match timeout_at(deadline, TcpStream::connect(socket_addr)).await {
            Ok(Ok(mut stream)) => {
                let rtt = start.elapsed();
                let _ = timeout_at(deadline, stream.shutdown()).await;
                tracing::debug!("{} open ({:?})", socket_addr, rtt);
                Outcome::Live(ProbeMeta::Port {
                    service: self.services.get(&port).cloned(),
                    rtt_ms: rtt.as_millis() as u64,
                })
            }
            Ok(Err(e)) => classify_connect_error(socket_addr, &e),
            Err(_) => self.timeout_policy().outcome(),
        }
    }
}
