use thiserror::Error;

/// Startup configuration errors.
///
/// Per-domain network failures never surface here; they are absorbed
/// where they happen.
#[derive(Debug, Error)]
pub enum SolveError {
	#[error("failed to read {kind} file '{path}': {source}")]
	ReadFile {
		kind: &'static str,
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid CIDR range '{value}' on line {line}: {source}")]
	InvalidRange {
		line: usize,
		value: String,
		#[source]
		source: ipnetwork::IpNetworkError,
	},

	#[error("CDN range table '{0}' contains no ranges")]
	EmptyRangeTable(String),

	#[error("failed to build HTTP client: {0}")]
	HttpClient(#[source] reqwest::Error),
}
