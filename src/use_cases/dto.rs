use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::summary::{PaymentsSummary, ProcessorSummary};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SubmitPaymentCommand {
	pub correlation_id: Uuid,
	pub amount:         Decimal,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GetPaymentsSummaryQuery {
	pub from_ms: Option<i64>,
	pub to_ms:   Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorSummaryResponse {
	pub total_requests: i64,
	pub total_amount:   Decimal,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentsSummaryResponse {
	pub default:  ProcessorSummaryResponse,
	pub fallback: ProcessorSummaryResponse,
}

impl From<ProcessorSummary> for ProcessorSummaryResponse {
	fn from(summary: ProcessorSummary) -> Self {
		Self {
			total_requests: summary.total_requests,
			total_amount:   summary.total_amount,
		}
	}
}

impl From<PaymentsSummary> for PaymentsSummaryResponse {
	fn from(summary: PaymentsSummary) -> Self {
		Self {
			default:  summary.default.into(),
			fallback: summary.fallback.into(),
		}
	}
}
