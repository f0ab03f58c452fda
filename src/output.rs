use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL};

use anyhow::Result;

use crate::cdn::CdnRanges;
use crate::transport::{ResolutionRecord, SolveConfig};

/// Platform line separator used between report lines
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Render records as hosts-file lines grouped by CDN membership.
///
/// Records inside the CDN's ranges come first under a `# <name> ip`
/// header, the rest follow. Each line is `<ip>\t<domain>`; order within
/// a group follows the input.
pub fn format_report(records: &[ResolutionRecord], ranges: &CdnRanges) -> String {
	let (cdn, other): (Vec<&ResolutionRecord>, Vec<&ResolutionRecord>) = records.iter()
		.partition(|r| ranges.is_known_cdn_range(&r.ip));

	let mut lines = Vec::with_capacity(records.len() + 1);
	if !cdn.is_empty() {
		lines.push(format!("# {} ip", ranges.name()));
	}
	for r in cdn.into_iter().chain(other) {
		lines.push(format!("{}\t{}", r.ip, r.domain));
	}
	lines.join(LINE_SEPARATOR)
}

/// Print a summary of the run configuration before resolving.
///
/// Goes to stderr so the report on stdout stays clean.
pub fn print_config_summary(domain_count: usize, ranges: &CdnRanges, config: &SolveConfig) {
	eprintln!("DoH Resolution Configuration");
	eprintln!("============================");
	eprintln!("Domains:        {}", domain_count);
	eprintln!("Primary DoH:    {}", config.primary_url);
	eprintln!("Secondary DoH:  {}", config.secondary_url);
	eprintln!("Probe timeout:  {} ms", config.probe_timeout.as_millis());
	eprintln!("Query timeout:  {} ms", config.query_timeout.as_millis());
	eprintln!("Concurrency:    {}", config.max_inflight);
	eprintln!("CDN table:      {} ({} ranges)", ranges.name(), ranges.len());
	eprintln!();
}

/// Print resolved records as a formatted table.
pub fn print_summary_table(records: &[ResolutionRecord], ranges: &CdnRanges) {
	let mut table = Table::new();
	table.load_preset(UTF8_FULL);
	table.set_content_arrangement(ContentArrangement::Dynamic);
	table.set_header(vec!["Domain", "IP", "Provider", "Latency", "CDN"]);

	for r in records {
		let cdn = if ranges.is_known_cdn_range(&r.ip) { ranges.name() } else { "" };
		table.add_row(vec![
			r.domain.clone(),
			r.ip.clone(),
			r.provider.to_string(),
			format!("{:.1} ms", r.latency.as_secs_f64() * 1000.0),
			cdn.to_string(),
		]);
	}

	eprintln!("\nResolution Results");
	eprintln!("==================\n");
	eprintln!("{table}");
}

/// Write resolved records to a CSV file.
pub fn write_csv(path: &str, records: &[ResolutionRecord], ranges: &CdnRanges) -> Result<()> {
	let mut writer = csv::Writer::from_path(path)?;
	write_records(&mut writer, records, ranges)?;
	writer.flush()?;
	eprintln!("\nRecords written to: {}", path);
	Ok(())
}

fn write_records<W: std::io::Write>(
	writer: &mut csv::Writer<W>,
	records: &[ResolutionRecord],
	ranges: &CdnRanges,
) -> Result<()> {
	writer.write_record(["domain", "ip", "provider", "latency_ms", "cdn"])?;
	for r in records {
		writer.write_record([
			r.domain.clone(),
			r.ip.clone(),
			r.provider.to_string(),
			format!("{:.2}", r.latency.as_secs_f64() * 1000.0),
			ranges.is_known_cdn_range(&r.ip).to_string(),
		])?;
	}
	Ok(())
}
