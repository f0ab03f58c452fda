use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::cdn::CdnRanges;
use crate::domains::normalize_batch;
use crate::output::format_report;
use crate::probe::LatencyProbe;
use crate::provider::ProviderClient;
use crate::select::select_fastest;
use crate::transport::{Provider, ResolutionRecord};

/// Two-phase DoH resolution engine.
///
/// Every domain is first resolved through the primary provider. Only
/// the domains that produced no reachable IP are then retried through
/// the secondary provider.
pub struct Resolver {
	client: Arc<dyn ProviderClient>,
	probe: Arc<dyn LatencyProbe>,
	semaphore: Arc<Semaphore>,
}

impl Resolver {
	pub fn new(
		client: Arc<dyn ProviderClient>,
		probe: Arc<dyn LatencyProbe>,
		max_inflight: usize,
	) -> Self {
		Self {
			client,
			probe,
			semaphore: Arc::new(Semaphore::new(max_inflight.clamp(1, Semaphore::MAX_PERMITS))),
		}
	}

	/// Resolve a batch of domains to their fastest reachable IPs.
	///
	/// Input is normalized, deduplicated and sorted first. Output lists
	/// primary-resolved domains, in sorted order, followed by
	/// secondary-resolved ones. Unresolvable domains are left out.
	pub async fn resolve_all(&self, domains: &[String]) -> Vec<ResolutionRecord> {
		let domains = normalize_batch(domains);
		info!(domains = domains.len(), "resolving via primary provider");
		let primary = self.run_phase(Provider::Primary, &domains).await;

		let resolved: HashSet<&str> = primary.iter()
			.map(|r| r.domain.as_str())
			.collect();
		let residual: Vec<String> = domains.iter()
			.filter(|d| !resolved.contains(d.as_str()))
			.cloned()
			.collect();
		info!(failed = residual.len(), "primary provider failures");

		let secondary = if residual.is_empty() {
			Vec::new()
		} else {
			self.run_phase(Provider::Secondary, &residual).await
		};
		info!(
			primary = primary.len(),
			secondary = secondary.len(),
			unresolved = residual.len() - secondary.len(),
			"resolution finished",
		);

		let mut records = primary;
		records.extend(secondary);
		records
	}

	/// Query and select for every domain against one provider.
	///
	/// One task per domain, bounded by the shared worker semaphore.
	/// Handles are joined in spawn order so results keep input order.
	async fn run_phase(&self, provider: Provider, domains: &[String]) -> Vec<ResolutionRecord> {
		let mut handles = Vec::with_capacity(domains.len());
		for domain in domains {
			let sem = self.semaphore.clone();
			let client = self.client.clone();
			let probe = self.probe.clone();
			let domain = domain.clone();

			handles.push(tokio::spawn(async move {
				let _permit = match sem.acquire_owned().await {
					Ok(p) => p,
					Err(_) => return None,
				};
				let candidates = client.query(provider, &domain).await;
				let candidate_count = candidates.len();
				match select_fastest(probe, candidates).await {
					Some((ip, latency)) => {
						debug!(%domain, %ip, ?latency, %provider, "selected fastest ip");
						Some(ResolutionRecord { domain, ip, provider, latency })
					}
					None => {
						debug!(%domain, candidates = candidate_count, %provider, "no reachable ip");
						None
					}
				}
			}));
		}

		let mut records = Vec::new();
		for handle in handles {
			match handle.await {
				Ok(Some(record)) => records.push(record),
				Ok(None) => {}
				Err(e) => {
					warn!(error = %e, %provider, "resolution task failed");
				}
			}
		}
		records
	}
}

/// Resolve a batch of domains and render the grouped hosts report.
pub async fn dns_solve(resolver: &Resolver, ranges: &CdnRanges, urls: &[String]) -> String {
	let records = resolver.resolve_all(urls).await;
	format_report(&records, ranges)
}
