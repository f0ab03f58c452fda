use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use tokio::sync::Semaphore;
use tracing_subscriber::EnvFilter;

use fastest_hosts::cli::Cli;
use fastest_hosts::output::{self, format_report};
use fastest_hosts::probe::TcpProbe;
use fastest_hosts::provider::{self, HttpProviderClient};
use fastest_hosts::{domains, CdnRanges, Resolver, SolveConfig};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// RUST_LOG wins over -v; logs go to stderr, the report to stdout
	let default_level = match cli.verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();

	// The CDN table is required for every report, so load it first
	let ranges = match &cli.cdn_ranges {
		Some(path) => CdnRanges::from_file(&cli.cdn_name, path)?,
		None => CdnRanges::cloudflare()?.with_name(&cli.cdn_name),
	};

	// Collect domains from arguments and file, or fall back to defaults
	let mut inputs = cli.domains.clone();
	if let Some(path) = &cli.domain_file {
		inputs.extend(domains::read_domain_file(path)?);
	}
	if inputs.is_empty() {
		inputs = domains::default_domains();
	}

	let mut config = SolveConfig {
		probe_timeout: Duration::from_millis(cli.timeout),
		query_timeout: Duration::from_millis(cli.query_timeout),
		max_inflight: cli.concurrency,
		..SolveConfig::default()
	};
	if config.max_inflight == 0 || config.max_inflight > Semaphore::MAX_PERMITS {
		return Err(anyhow!(
			"--concurrency must be between 1 and {}", Semaphore::MAX_PERMITS
		));
	}
	if let Some(url) = &cli.primary_url {
		config.primary_url = provider::parse_doh_url(url)?;
	}
	if let Some(url) = &cli.secondary_url {
		config.secondary_url = provider::parse_doh_url(url)?;
	}

	output::print_config_summary(domains::normalize_batch(&inputs).len(), &ranges, &config);

	let client = Arc::new(HttpProviderClient::new(&config)?);
	let probe = Arc::new(TcpProbe::new(config.probe_timeout));
	let resolver = Resolver::new(client, probe, config.max_inflight);

	let records = resolver.resolve_all(&inputs).await;
	let report = format_report(&records, &ranges);

	if cli.summary {
		output::print_summary_table(&records, &ranges);
	}
	if let Some(path) = &cli.csv {
		output::write_csv(path, &records, &ranges)?;
	}

	match &cli.output {
		Some(path) => {
			std::fs::write(path, format!("{}{}", report, output::LINE_SEPARATOR))
				.map_err(|e| anyhow!("failed to write report '{}': {}", path, e))?;
			eprintln!("Report written to: {}", path);
		}
		None => println!("{}", report),
	}

	Ok(())
}
