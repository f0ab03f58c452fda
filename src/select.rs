use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::probe::LatencyProbe;

/// Probe every candidate concurrently and return the fastest one.
///
/// One task is spawned per candidate. Failed probes and zero latencies
/// are dropped; on equal latency the earlier candidate wins. Returns
/// None when the list is empty or nothing is reachable.
pub async fn select_fastest(
	probe: Arc<dyn LatencyProbe>,
	ips: Vec<String>,
) -> Option<(String, Duration)> {
	let mut handles = Vec::with_capacity(ips.len());
	for ip in ips {
		let probe = probe.clone();
		handles.push(tokio::spawn(async move {
			let latency = probe.probe(&ip).await;
			(ip, latency)
		}));
	}

	// Join in spawn order so ties resolve by input position
	let mut results = Vec::with_capacity(handles.len());
	for handle in handles {
		match handle.await {
			Ok((ip, Some(latency))) if !latency.is_zero() => results.push((ip, latency)),
			Ok(_) => {}
			Err(e) => {
				warn!(error = %e, "probe task failed");
			}
		}
	}

	fastest(results)
}

/// Pick the minimum latency, keeping the first on ties.
fn fastest(results: Vec<(String, Duration)>) -> Option<(String, Duration)> {
	results.into_iter().min_by_key(|(_, latency)| *latency)
}
