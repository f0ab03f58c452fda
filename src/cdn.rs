use std::net::IpAddr;

use ipnetwork::IpNetwork;

use crate::error::SolveError;

/// Cloudflare's published edge ranges (https://www.cloudflare.com/ips/)
const CLOUDFLARE_RANGES: &[&str] = &[
	// IPv4
	"173.245.48.0/20",
	"103.21.244.0/22",
	"103.22.200.0/22",
	"103.31.4.0/22",
	"141.101.64.0/18",
	"108.162.192.0/18",
	"190.93.240.0/20",
	"188.114.96.0/20",
	"197.234.240.0/22",
	"198.41.128.0/17",
	"162.158.0.0/15",
	"104.16.0.0/13",
	"104.24.0.0/14",
	"172.64.0.0/13",
	"131.0.72.0/22",
	// IPv6
	"2400:cb00::/32",
	"2606:4700::/32",
	"2803:f800::/32",
	"2405:b500::/32",
	"2405:8100::/32",
	"2a06:98c0::/29",
	"2c0f:f248::/32",
];

/// Static table of one CDN's published address ranges
#[derive(Debug, Clone)]
pub struct CdnRanges {
	name: String,
	networks: Vec<IpNetwork>,
}

impl CdnRanges {
	/// Built-in Cloudflare table.
	pub fn cloudflare() -> Result<Self, SolveError> {
		Self::parse("CloudFlare", &CLOUDFLARE_RANGES.join("\n"))
	}

	/// Parse a table with one CIDR range per line.
	///
	/// Blank lines and lines starting with '#' are skipped. A table with
	/// no ranges at all is rejected.
	pub fn parse(name: &str, content: &str) -> Result<Self, SolveError> {
		let mut networks = Vec::new();
		for (idx, line) in content.lines().enumerate() {
			let trimmed = line.trim();
			if trimmed.is_empty() || trimmed.starts_with('#') {
				continue;
			}
			let network = trimmed.parse::<IpNetwork>()
				.map_err(|source| SolveError::InvalidRange {
					line: idx + 1,
					value: trimmed.to_string(),
					source,
				})?;
			networks.push(network);
		}
		if networks.is_empty() {
			return Err(SolveError::EmptyRangeTable(name.to_string()));
		}
		Ok(Self {
			name: name.to_string(),
			networks,
		})
	}

	/// Load a range table from a file.
	pub fn from_file(name: &str, path: &str) -> Result<Self, SolveError> {
		let content = std::fs::read_to_string(path)
			.map_err(|source| SolveError::ReadFile {
				kind: "CDN range",
				path: path.to_string(),
				source,
			})?;
		Self::parse(name, &content)
	}

	/// Rename the table; the name only shows up in report headers.
	pub fn with_name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn len(&self) -> usize {
		self.networks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.networks.is_empty()
	}

	/// Whether `ip` falls inside any range of the table.
	///
	/// Strings that are not IP addresses are never in range.
	pub fn is_known_cdn_range(&self, ip: &str) -> bool {
		let addr: IpAddr = match ip.trim().parse() {
			Ok(a) => a,
			Err(_) => return false,
		};
		self.networks.iter().any(|net| net.contains(addr))
	}
}
