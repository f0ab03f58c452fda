use hickory_proto::rr::RecordType;
use serde::Deserialize;
use tracing::{debug, trace};

/// JSON body of a DoH `application/dns-json` answer.
///
/// Only the answer section is read; status flags and the question
/// section are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct DohResponse {
	#[serde(rename = "Answer", default)]
	pub answer: Vec<DohAnswer>,
}

/// Single answer record of a DoH JSON response
#[derive(Debug, Deserialize)]
pub struct DohAnswer {
	#[serde(rename = "type")]
	pub record_type: u16,
	pub data: String,
}

/// Extract A-record addresses from a DoH JSON response body.
///
/// Empty or malformed bodies yield no addresses. CNAME and any other
/// non-A records in the answer section are discarded.
pub fn parse_a_records(body: &str) -> Vec<String> {
	if body.trim().is_empty() {
		return Vec::new();
	}
	let response: DohResponse = match serde_json::from_str(body) {
		Ok(r) => r,
		Err(e) => {
			debug!(error = %e, "unparseable DoH response");
			return Vec::new();
		}
	};

	let a_code = u16::from(RecordType::A);
	response.answer.into_iter()
		.filter(|record| {
			let keep = record.record_type == a_code;
			if !keep {
				trace!(
					record_type = %RecordType::from(record.record_type),
					data = %record.data,
					"discarding non-A answer",
				);
			}
			keep
		})
		.map(|record| record.data)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_a_records_only() {
		let body = r#"{
			"Status": 0,
			"Answer": [
				{"name": "www.github.com.", "type": 5, "TTL": 60, "data": "github.com."},
				{"name": "github.com.", "type": 1, "TTL": 60, "data": "20.205.243.166"},
				{"name": "github.com.", "type": 1, "TTL": 60, "data": "20.205.243.168"}
			]
		}"#;
		let ips = parse_a_records(body);
		assert_eq!(ips, vec!["20.205.243.166", "20.205.243.168"]);
	}

	#[test]
	fn test_missing_answer_section() {
		let body = r#"{"Status": 3, "Question": [{"name": "nope.invalid.", "type": 1}]}"#;
		assert!(parse_a_records(body).is_empty());
	}

	#[test]
	fn test_empty_body() {
		assert!(parse_a_records("").is_empty());
		assert!(parse_a_records("   \n").is_empty());
	}

	#[test]
	fn test_malformed_body() {
		assert!(parse_a_records("<html>502 Bad Gateway</html>").is_empty());
		assert!(parse_a_records(r#"{"Answer": "oops"}"#).is_empty());
	}

	#[test]
	fn test_aaaa_discarded() {
		let body = r#"{"Answer": [{"type": 28, "data": "2606:4700::6810:84e5"}]}"#;
		assert!(parse_a_records(body).is_empty());
	}
}
