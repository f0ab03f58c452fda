use std::fmt;
use std::time::Duration;

/// DoH provider tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
	/// Queried for every domain first
	Primary,
	/// Queried only for domains the primary could not resolve
	Secondary,
}

impl fmt::Display for Provider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Provider::Primary => write!(f, "primary"),
			Provider::Secondary => write!(f, "secondary"),
		}
	}
}

/// Final resolution of one domain to its fastest reachable IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRecord {
	pub domain: String,
	pub ip: String,
	/// Provider whose answer produced the selected IP
	pub provider: Provider,
	/// Connect latency of the selected IP
	pub latency: Duration,
}

/// Resolution run configuration
#[derive(Debug, Clone)]
pub struct SolveConfig {
	/// Per-attempt TCP connect timeout for latency probes
	pub probe_timeout: Duration,
	/// Overall timeout for one DoH request
	pub query_timeout: Duration,
	/// Maximum concurrent domain tasks per phase
	pub max_inflight: usize,
	pub primary_url: String,
	pub secondary_url: String,
}

impl Default for SolveConfig {
	fn default() -> Self {
		Self {
			probe_timeout: Duration::from_millis(2000),
			query_timeout: Duration::from_millis(5000),
			max_inflight: 64,
			primary_url: crate::provider::PRIMARY_DOH_URL.to_string(),
			secondary_url: crate::provider::SECONDARY_DOH_URL.to_string(),
		}
	}
}
