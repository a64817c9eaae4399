use crate::domain::queue::PaymentQueue;
use crate::domain::summary::SummaryStore;

/// Wipes the summary series and all three queues. Load test harnesses
/// call this between runs; it is not part of the payment flow.
#[derive(Clone)]
pub struct PurgePaymentsUseCase<Q: PaymentQueue, S: SummaryStore> {
	payment_queue: Q,
	summary_store: S,
}

impl<Q: PaymentQueue, S: SummaryStore> PurgePaymentsUseCase<Q, S> {
	pub fn new(payment_queue: Q, summary_store: S) -> Self {
		Self {
			payment_queue,
			summary_store,
		}
	}

	pub async fn execute(
		&self,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		self.summary_store
			.clear()
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;
		self.payment_queue
			.clear()
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		Ok(())
	}
}
