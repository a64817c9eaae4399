use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::processor::ProcessorKind;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingPayment {
	pub correlation_id: Uuid,
	pub amount:         Decimal,
	// Stamped by the worker on the first dispatch attempt, never
	// rewritten on retry.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub requested_at:   Option<DateTime<Utc>>,
	#[serde(default)]
	pub retry_count:    u32,
}

impl PendingPayment {
	pub fn new(correlation_id: Uuid, amount: Decimal) -> Self {
		Self {
			correlation_id,
			amount,
			requested_at: None,
			retry_count: 0,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPayment {
	pub correlation_id: Uuid,
	pub amount:         Decimal,
	pub processor:      ProcessorKind,
	pub processed_at:   DateTime<Utc>,
}
