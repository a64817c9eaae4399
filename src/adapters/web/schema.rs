use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentRequest {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	pub amount:         Decimal,
}

#[derive(Debug, Deserialize)]
pub struct PaymentsSummaryFilter {
	#[serde(deserialize_with = "lenient_utc_timestamp", default)]
	pub from: Option<OffsetDateTime>,
	#[serde(deserialize_with = "lenient_utc_timestamp", default)]
	pub to:   Option<OffsetDateTime>,
}

// Callers sometimes omit the trailing `Z`; such timestamps are UTC.
fn lenient_utc_timestamp<'de, D>(
	deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
	D: Deserializer<'de>,
{
	let Some(raw) = Option::<String>::deserialize(deserializer)? else {
		return Ok(None);
	};

	OffsetDateTime::parse(&raw, &Rfc3339)
		.or_else(|_| OffsetDateTime::parse(&format!("{raw}Z"), &Rfc3339))
		.map(Some)
		.map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse_filter(raw: &str) -> PaymentsSummaryFilter {
		serde_json::from_str(raw).unwrap()
	}

	#[test]
	fn test_filter_parses_rfc3339_timestamps() {
		let filter = parse_filter(
			r#"{"from":"2025-07-12T10:00:00Z","to":"2025-07-12T11:00:00.123Z"}"#,
		);

		assert_eq!(filter.from.unwrap().unix_timestamp(), 1752314400);
		assert_eq!(
			filter.to.unwrap().unix_timestamp_nanos() % 1_000_000_000,
			123_000_000
		);
	}

	#[test]
	fn test_filter_tolerates_missing_trailing_z() {
		let filter = parse_filter(r#"{"from":"2025-07-12T10:00:00"}"#);

		assert_eq!(filter.from.unwrap().unix_timestamp(), 1752314400);
		assert!(filter.to.is_none());
	}

	#[test]
	fn test_filter_defaults_to_open_bounds() {
		let filter = parse_filter("{}");

		assert!(filter.from.is_none());
		assert!(filter.to.is_none());
	}

	#[test]
	fn test_filter_rejects_garbage_timestamps() {
		let parsed: Result<PaymentsSummaryFilter, _> =
			serde_json::from_str(r#"{"from":"yesterday"}"#);

		assert!(parsed.is_err());
	}
}
