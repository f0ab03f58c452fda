use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::trace;

/// Measure how fast an address can be reached.
///
/// Returns the connect latency, or None when the address is unreachable.
#[async_trait]
pub trait LatencyProbe: Send + Sync {
	async fn probe(&self, ip: &str) -> Option<Duration>;
}

/// TCP connect probe with a single fallback port.
///
/// Tries `primary_port` first (HTTPS), then `fallback_port` (HTTP). Each
/// attempt gets the full timeout; the reported latency is the duration
/// of the attempt that succeeded only.
#[derive(Debug, Clone)]
pub struct TcpProbe {
	pub timeout: Duration,
	pub primary_port: u16,
	pub fallback_port: u16,
}

impl TcpProbe {
	pub fn new(timeout: Duration) -> Self {
		Self {
			timeout,
			primary_port: 443,
			fallback_port: 80,
		}
	}
}

/// Time a single TCP connect to `addr`, bounded by `timeout`.
async fn connect_once(addr: SocketAddr, timeout: Duration) -> Option<Duration> {
	let start = Instant::now();
	match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
		Ok(Ok(_stream)) => Some(start.elapsed()),
		Ok(Err(e)) => {
			trace!(%addr, error = %e, "connect failed");
			None
		}
		Err(_) => {
			trace!(%addr, "connect timed out");
			None
		}
	}
}

#[async_trait]
impl LatencyProbe for TcpProbe {
	async fn probe(&self, ip: &str) -> Option<Duration> {
		let ip: IpAddr = ip.trim().parse().ok()?;
		for port in [self.primary_port, self.fallback_port] {
			if let Some(elapsed) = connect_once(SocketAddr::new(ip, port), self.timeout).await {
				return Some(elapsed);
			}
		}
		None
	}
}
