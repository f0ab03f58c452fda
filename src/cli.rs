use clap::Parser;

/// Resolve domains over DoH and pick the fastest reachable IP
#[derive(Parser, Debug)]
#[command(name = "fastest-hosts")]
#[command(about = "Resolve domains over DNS-over-HTTPS and emit the fastest IPs as hosts entries")]
pub struct Cli {
	/// Domains or URLs to resolve (duplicates are ignored)
	pub domains: Vec<String>,

	/// File containing domains to resolve (one per line)
	#[arg(short = 'f', long = "domain-file")]
	pub domain_file: Option<String>,

	/// TCP connect timeout per probe attempt in milliseconds
	#[arg(short = 't', long = "timeout", default_value = "2000")]
	pub timeout: u64,

	/// DoH request timeout in milliseconds
	#[arg(long = "query-timeout", default_value = "5000")]
	pub query_timeout: u64,

	/// Maximum concurrent domain resolutions
	#[arg(short = 'c', long = "concurrency", default_value = "64")]
	pub concurrency: usize,

	/// Primary DoH JSON endpoint
	#[arg(long = "primary-url")]
	pub primary_url: Option<String>,

	/// Secondary DoH JSON endpoint, used for domains the primary fails on
	#[arg(long = "secondary-url")]
	pub secondary_url: Option<String>,

	/// File of CDN CIDR ranges (one per line); defaults to Cloudflare's
	#[arg(long = "cdn-ranges")]
	pub cdn_ranges: Option<String>,

	/// CDN name shown in the report header
	#[arg(long = "cdn-name", default_value = "CloudFlare")]
	pub cdn_name: String,

	/// Write the report to a file instead of stdout
	#[arg(short = 'o', long = "output")]
	pub output: Option<String>,

	/// Also write resolved records to a CSV file
	#[arg(long = "csv")]
	pub csv: Option<String>,

	/// Print a table of resolved records to stderr
	#[arg(long = "summary")]
	pub summary: bool,

	/// Increase log verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
	pub verbose: u8,
}
