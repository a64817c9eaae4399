use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use rust_decimal::Decimal;

use crate::domain::payment::CompletedPayment;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessorSummary {
	pub total_requests: i64,
	pub total_amount:   Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentsSummary {
	pub default:  ProcessorSummary,
	pub fallback: ProcessorSummary,
}

#[derive(Debug, Display, Error)]
#[display("summary store error: {reason}")]
pub struct SummaryStoreError {
	pub reason: String,
}

impl SummaryStoreError {
	pub fn new(cause: impl std::fmt::Display) -> Self {
		Self {
			reason: cause.to_string(),
		}
	}
}

#[async_trait]
pub trait SummaryStore: Send + Sync + 'static {
	/// Record a completed payment. Recording the same payment twice is
	/// a no-op; the first outcome wins.
	async fn add(
		&self,
		payment: CompletedPayment,
	) -> Result<(), SummaryStoreError>;

	/// Aggregate per processor over `[from_ms, to_ms]` (epoch millis,
	/// both inclusive); open bounds when `None`.
	async fn get(
		&self,
		from_ms: Option<i64>,
		to_ms: Option<i64>,
	) -> Result<PaymentsSummary, SummaryStoreError>;

	async fn clear(&self) -> Result<(), SummaryStoreError>;
}
