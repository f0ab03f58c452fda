use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::dns::parse_a_records;
use crate::error::SolveError;
use crate::transport::{Provider, SolveConfig};

/// Alibaba public DoH JSON endpoint
pub const PRIMARY_DOH_URL: &str = "https://dns.alidns.com/resolve";
/// Cloudflare public DoH JSON endpoint
pub const SECONDARY_DOH_URL: &str = "https://1.1.1.1/dns-query";

const DNS_JSON_CONTENT_TYPE: &str = "application/dns-json";

/// Resolve one domain against one DoH provider.
///
/// Implementations never fail: transport errors, bad statuses and
/// unparseable bodies all come back as an empty candidate list.
#[async_trait]
pub trait ProviderClient: Send + Sync {
	async fn query(&self, provider: Provider, domain: &str) -> Vec<String>;
}

/// Extra headers a provider requires on every request.
pub fn request_headers(provider: Provider) -> &'static [(&'static str, &'static str)] {
	match provider {
		Provider::Primary => &[],
		// Cloudflare answers with wire format unless JSON is requested
		Provider::Secondary => &[("accept", DNS_JSON_CONTENT_TYPE)],
	}
}

/// Value of the `type` query parameter each provider expects for A lookups.
fn record_type_param(provider: Provider) -> &'static str {
	match provider {
		Provider::Primary => "1",
		Provider::Secondary => "A",
	}
}

/// Validate a DoH endpoint given on the command line.
///
/// Only absolute http(s) URLs are accepted; the query string is built
/// per request, so any existing one is kept and appended to.
pub fn parse_doh_url(input: &str) -> Result<String> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return Err(anyhow!("empty DoH endpoint"));
	}
	let url = Url::parse(trimmed)
		.map_err(|e| anyhow!("invalid DoH endpoint '{}': {}", trimmed, e))?;
	match url.scheme() {
		"https" | "http" => Ok(url.to_string()),
		other => Err(anyhow!(
			"unsupported scheme '{}' in DoH endpoint '{}'", other, trimmed
		)),
	}
}

/// DoH JSON client backed by a shared reqwest connection pool
pub struct HttpProviderClient {
	client: reqwest::Client,
	primary_url: String,
	secondary_url: String,
}

impl HttpProviderClient {
	pub fn new(config: &SolveConfig) -> Result<Self, SolveError> {
		let client = reqwest::Client::builder()
			.use_rustls_tls()
			.timeout(config.query_timeout)
			.build()
			.map_err(SolveError::HttpClient)?;
		Ok(Self {
			client,
			primary_url: config.primary_url.clone(),
			secondary_url: config.secondary_url.clone(),
		})
	}

	/// Build the full request URL for a domain lookup.
	pub fn request_url(&self, provider: Provider, domain: &str) -> Option<Url> {
		let base = match provider {
			Provider::Primary => &self.primary_url,
			Provider::Secondary => &self.secondary_url,
		};
		Url::parse_with_params(
			base,
			&[("name", domain), ("type", record_type_param(provider))],
		).ok()
	}

	/// GET a URL and return its body, or an empty string on any failure.
	async fn fetch(&self, url: Url, headers: &[(&str, &str)]) -> String {
		let mut request = self.client.get(url.clone());
		for (name, value) in headers {
			request = request.header(*name, *value);
		}

		let response = match request.send().await {
			Ok(r) => r,
			Err(e) => {
				debug!(%url, error = %e, "DoH request failed");
				return String::new();
			}
		};
		let status = response.status();
		if !status.is_success() {
			debug!(%url, status = status.as_u16(), "DoH provider returned error status");
			return String::new();
		}
		match response.text().await {
			Ok(body) => body,
			Err(e) => {
				debug!(%url, error = %e, "failed to read DoH response body");
				String::new()
			}
		}
	}
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
	async fn query(&self, provider: Provider, domain: &str) -> Vec<String> {
		let url = match self.request_url(provider, domain) {
			Some(url) => url,
			None => return Vec::new(),
		};
		let body = self.fetch(url, request_headers(provider)).await;
		parse_a_records(&body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn client() -> HttpProviderClient {
		HttpProviderClient::new(&SolveConfig::default()).unwrap()
	}

	#[test]
	fn test_primary_url() {
		let url = client().request_url(Provider::Primary, "github.com").unwrap();
		assert_eq!(url.as_str(), "https://dns.alidns.com/resolve?name=github.com&type=1");
	}

	#[test]
	fn test_secondary_url() {
		let url = client().request_url(Provider::Secondary, "github.com").unwrap();
		assert_eq!(url.as_str(), "https://1.1.1.1/dns-query?name=github.com&type=A");
	}

	#[test]
	fn test_secondary_requires_json_accept() {
		assert!(request_headers(Provider::Primary).is_empty());
		assert_eq!(
			request_headers(Provider::Secondary),
			&[("accept", "application/dns-json")],
		);
	}

	#[test]
	fn test_parse_doh_url() {
		assert!(parse_doh_url("https://dns.google/resolve").is_ok());
		assert!(parse_doh_url("  ").is_err());
		assert!(parse_doh_url("not a url").is_err());
		assert!(parse_doh_url("ftp://example.com/dns").is_err());
	}

	/// Serve one canned HTTP response and hand back the raw request head.
	async fn serve_once(
		status_line: &'static str,
		body: &'static str,
	) -> (String, tokio::task::JoinHandle<String>) {
		use tokio::io::{AsyncReadExt, AsyncWriteExt};

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let base = format!("http://{}/dns-query", listener.local_addr().unwrap());
		let handle = tokio::spawn(async move {
			let (mut stream, _) = listener.accept().await.unwrap();
			let mut head = Vec::new();
			let mut buf = [0u8; 1024];
			while !head.windows(4).any(|w| w == b"\r\n\r\n") {
				let n = stream.read(&mut buf).await.unwrap();
				if n == 0 {
					break;
				}
				head.extend_from_slice(&buf[..n]);
			}
			let response = format!(
				"{}\r\ncontent-type: application/dns-json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
				status_line, body.len(), body,
			);
			stream.write_all(response.as_bytes()).await.unwrap();
			String::from_utf8_lossy(&head).to_lowercase()
		});
		(base, handle)
	}

	#[tokio::test]
	async fn test_secondary_query_sends_accept_header() {
		let body = r#"{"Answer":[{"type":5,"data":"a.example.com."},{"type":1,"data":"2.2.2.2"}]}"#;
		let (base, handle) = serve_once("HTTP/1.1 200 OK", body).await;
		let config = SolveConfig {
			secondary_url: base,
			..SolveConfig::default()
		};
		let client = HttpProviderClient::new(&config).unwrap();

		let ips = client.query(Provider::Secondary, "b.example.com").await;
		assert_eq!(ips, vec!["2.2.2.2"]);

		let head = handle.await.unwrap();
		assert!(head.starts_with("get /dns-query?name=b.example.com&type=a "));
		assert!(head.contains("accept: application/dns-json"));
	}

	#[tokio::test]
	async fn test_error_status_yields_nothing() {
		let body = r#"{"Answer":[{"type":1,"data":"2.2.2.2"}]}"#;
		let (base, handle) = serve_once("HTTP/1.1 503 Service Unavailable", body).await;
		let config = SolveConfig {
			primary_url: base,
			..SolveConfig::default()
		};
		let client = HttpProviderClient::new(&config).unwrap();

		assert!(client.query(Provider::Primary, "b.example.com").await.is_empty());
		handle.await.unwrap();
	}

	#[tokio::test]
	async fn test_stalled_provider_times_out() {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let base = format!("http://{}/resolve", listener.local_addr().unwrap());
		// Accept and hold the connection without ever answering
		let handle = tokio::spawn(async move {
			let (stream, _) = listener.accept().await.unwrap();
			tokio::time::sleep(std::time::Duration::from_secs(3)).await;
			drop(stream);
		});

		let config = SolveConfig {
			primary_url: base,
			query_timeout: std::time::Duration::from_millis(200),
			..SolveConfig::default()
		};
		let client = HttpProviderClient::new(&config).unwrap();

		let start = std::time::Instant::now();
		assert!(client.query(Provider::Primary, "github.com").await.is_empty());
		assert!(start.elapsed() < std::time::Duration::from_secs(2));
		handle.abort();
	}

	#[tokio::test]
	async fn test_unreachable_provider_yields_nothing() {
		// Bind then drop to get a local port nobody listens on
		let port = {
			let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
			listener.local_addr().unwrap().port()
		};
		let config = SolveConfig {
			primary_url: format!("http://127.0.0.1:{}/resolve", port),
			..SolveConfig::default()
		};
		let client = HttpProviderClient::new(&config).unwrap();
		let ips = client.query(Provider::Primary, "github.com").await;
		assert!(ips.is_empty());
	}
}
