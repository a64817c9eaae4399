use async_trait::async_trait;
use log::warn;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use rust_decimal::Decimal;

use crate::domain::payment::CompletedPayment;
use crate::domain::processor::ProcessorKind;
use crate::domain::summary::{
	PaymentsSummary, ProcessorSummary, SummaryStore, SummaryStoreError,
};
use crate::infrastructure::config::redis::series_key;

/// Completed payments live in one sorted set per processor, scored by
/// `processed_at` in epoch millis with member `"{correlation_id}:{amount}"`.
/// Member uniqueness is what makes recording idempotent.
#[derive(Clone)]
pub struct RedisSummaryStore {
	client: Client,
}

impl RedisSummaryStore {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	async fn connection(
		&self,
	) -> Result<MultiplexedConnection, SummaryStoreError> {
		self.client
			.get_multiplexed_async_connection()
			.await
			.map_err(SummaryStoreError::new)
	}

	fn encode_member(payment: &CompletedPayment) -> String {
		format!(
			"{}:{:.2}",
			payment.correlation_id,
			payment.amount.round_dp(2)
		)
	}

	fn parse_member_amount(member: &str) -> Option<Decimal> {
		let (_, amount) = member.rsplit_once(':')?;
		amount.parse().ok()
	}

	async fn summary_for(
		&self,
		con: &mut MultiplexedConnection,
		kind: ProcessorKind,
		from_ms: Option<i64>,
		to_ms: Option<i64>,
	) -> Result<ProcessorSummary, SummaryStoreError> {
		let min = from_ms.map_or_else(|| "-inf".to_string(), |ms| ms.to_string());
		let max = to_ms.map_or_else(|| "+inf".to_string(), |ms| ms.to_string());

		let members: Vec<String> = con
			.zrangebyscore(series_key(kind), min, max)
			.await
			.map_err(SummaryStoreError::new)?;

		let mut summary = ProcessorSummary::default();
		for member in &members {
			let Some(amount) = Self::parse_member_amount(member) else {
				warn!("Skipping malformed member '{member}' in {kind} series");
				continue;
			};
			summary.total_requests += 1;
			summary.total_amount += amount;
		}

		Ok(summary)
	}
}

#[async_trait]
impl SummaryStore for RedisSummaryStore {
	async fn add(
		&self,
		payment: CompletedPayment,
	) -> Result<(), SummaryStoreError> {
		let mut con = self.connection().await?;

		// NX keeps the first recorded outcome; concurrent retries of
		// the same payment collapse into a no-op.
		let _added: i64 = redis::cmd("ZADD")
			.arg(series_key(payment.processor))
			.arg("NX")
			.arg(payment.processed_at.timestamp_millis())
			.arg(Self::encode_member(&payment))
			.query_async(&mut con)
			.await
			.map_err(SummaryStoreError::new)?;

		Ok(())
	}

	async fn get(
		&self,
		from_ms: Option<i64>,
		to_ms: Option<i64>,
	) -> Result<PaymentsSummary, SummaryStoreError> {
		let mut con = self.connection().await?;

		let default = self
			.summary_for(&mut con, ProcessorKind::Default, from_ms, to_ms)
			.await?;
		let fallback = self
			.summary_for(&mut con, ProcessorKind::Fallback, from_ms, to_ms)
			.await?;

		Ok(PaymentsSummary { default, fallback })
	}

	async fn clear(&self) -> Result<(), SummaryStoreError> {
		let mut con = self.connection().await?;

		redis::pipe()
			.atomic()
			.del(series_key(ProcessorKind::Default))
			.ignore()
			.del(series_key(ProcessorKind::Fallback))
			.ignore()
			.query_async::<()>(&mut con)
			.await
			.map_err(SummaryStoreError::new)?;

		Ok(())
	}
}
