use crate::domain::summary::{SummaryStore, SummaryStoreError};
use crate::use_cases::dto::{GetPaymentsSummaryQuery, PaymentsSummaryResponse};

#[derive(Clone)]
pub struct GetPaymentsSummaryUseCase<S: SummaryStore> {
	summary_store: S,
}

impl<S: SummaryStore> GetPaymentsSummaryUseCase<S> {
	pub fn new(summary_store: S) -> Self {
		Self { summary_store }
	}

	pub async fn execute(
		&self,
		query: GetPaymentsSummaryQuery,
	) -> Result<PaymentsSummaryResponse, SummaryStoreError> {
		let summary =
			self.summary_store.get(query.from_ms, query.to_ms).await?;

		Ok(summary.into())
	}
}
