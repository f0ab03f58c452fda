use std::net::IpAddr;

use reqwest::Url;

use crate::error::SolveError;

/// Return hosts commonly pinned in hosts files when DNS is polluted.
pub fn default_domains() -> Vec<String> {
	vec![
		"github.com",
		"api.github.com",
		"gist.github.com",
		"codeload.github.com",
		"github.global.ssl.fastly.net",
		"raw.githubusercontent.com",
		"gist.githubusercontent.com",
		"objects.githubusercontent.com",
		"avatars.githubusercontent.com",
		"user-images.githubusercontent.com",
		"github.githubassets.com",
		"github.io",
		"assets-cdn.github.com",
	].into_iter().map(String::from).collect()
}

/// Normalize one user-supplied entry to a bare lowercase host name.
///
/// Accepts plain host names, IP literals (IPv6 optionally bracketed)
/// and full URLs, of which only the host is kept. Returns None for
/// blank entries and URLs without a host.
pub fn normalize_domain(input: &str) -> Option<String> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return None;
	}

	let host = if trimmed.contains("://") {
		let url = Url::parse(trimmed).ok()?;
		url.host_str()?.to_string()
	} else if trimmed.parse::<IpAddr>().is_ok() {
		trimmed.to_string()
	} else if trimmed.starts_with('[') {
		// Bracketed IPv6 literal, possibly with port or path
		let url = Url::parse(&format!("http://{}", trimmed)).ok()?;
		url.host_str()?.to_string()
	} else {
		// Drop any path or port from "host:port/path" style input
		let end = trimmed.find(['/', ':']).unwrap_or(trimmed.len());
		trimmed[..end].to_string()
	};

	let host = host.trim_start_matches('[')
		.trim_end_matches(']')
		.trim_end_matches('.')
		.to_ascii_lowercase();
	if host.is_empty() {
		None
	} else {
		Some(host)
	}
}

/// Normalize a batch: drop blanks, deduplicate, sort.
///
/// Sorting makes every run over the same input set produce the same
/// output order.
pub fn normalize_batch(inputs: &[String]) -> Vec<String> {
	let mut domains: Vec<String> = inputs.iter()
		.filter_map(|d| normalize_domain(d))
		.collect();
	domains.sort();
	domains.dedup();
	domains
}

/// Read domains from a file, one per line.
///
/// Blank lines and lines starting with '#' are skipped. Only the first
/// token of a line is used, so trailing comments are ignored.
pub fn read_domain_file(path: &str) -> Result<Vec<String>, SolveError> {
	let content = std::fs::read_to_string(path)
		.map_err(|source| SolveError::ReadFile {
			kind: "domain",
			path: path.to_string(),
			source,
		})?;
	let domains: Vec<String> = content.lines()
		.map(|line| line.trim())
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.filter_map(|line| line.split_whitespace().next())
		.map(String::from)
		.collect();
	Ok(domains)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_domains_normalized() {
		let defaults = default_domains();
		assert!(!defaults.is_empty());
		for domain in &defaults {
			assert_eq!(normalize_domain(domain).as_deref(), Some(domain.as_str()));
		}
	}

	#[test]
	fn test_normalize_plain() {
		assert_eq!(normalize_domain(" GitHub.com. ").as_deref(), Some("github.com"));
		assert_eq!(normalize_domain("github.com:443").as_deref(), Some("github.com"));
		assert_eq!(normalize_domain("github.com/login").as_deref(), Some("github.com"));
	}

	#[test]
	fn test_normalize_url() {
		assert_eq!(
			normalize_domain("https://Raw.GithubUserContent.com/a/b").as_deref(),
			Some("raw.githubusercontent.com"),
		);
		assert_eq!(normalize_domain("http://example.com:8080").as_deref(), Some("example.com"));
	}

	#[test]
	fn test_normalize_ipv6_literal() {
		assert_eq!(normalize_domain("[::1]").as_deref(), Some("::1"));
		assert_eq!(normalize_domain("[2606:4700::1111]:443").as_deref(), Some("2606:4700::1111"));
		assert_eq!(normalize_domain("2606:4700::1111").as_deref(), Some("2606:4700::1111"));
		assert_eq!(normalize_domain("https://[::1]/x").as_deref(), Some("::1"));
		assert_eq!(normalize_domain("192.0.2.7").as_deref(), Some("192.0.2.7"));
	}

	#[test]
	fn test_normalize_blank() {
		assert!(normalize_domain("").is_none());
		assert!(normalize_domain("   ").is_none());
		assert!(normalize_domain(".").is_none());
	}

	#[test]
	fn test_batch_dedup_and_sort() {
		let input: Vec<String> = ["b.example.com", "a.example.com", "A.example.com", ""]
			.iter().map(|s| s.to_string()).collect();
		assert_eq!(normalize_batch(&input), vec!["a.example.com", "b.example.com"]);
	}

	#[test]
	fn test_read_domain_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("domains.txt");
		std::fs::write(&path, "# pinned\ngithub.com\n\n  api.github.com  # api\n").unwrap();
		let domains = read_domain_file(path.to_str().unwrap()).unwrap();
		assert_eq!(domains, vec!["github.com", "api.github.com"]);
	}

	#[test]
	fn test_read_missing_domain_file() {
		assert!(read_domain_file("/nonexistent/domains.txt").is_err());
	}
}
