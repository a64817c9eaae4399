use std::sync::Arc;

use derive_more::derive::{Display, Error};
use log::debug;

use crate::domain::health::ProcessorHealth;
use crate::domain::payment::{CompletedPayment, PendingPayment};
use crate::domain::processor::{ChargeError, ProcessorClient};
use crate::infrastructure::health::processor_health_monitor::HealthMonitor;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
	#[display("payment rejected with status {status}")]
	Definitive { status: u16 },
	#[display("no healthy payment processor available")]
	NoHealthyProcessor,
	#[display("all healthy payment processors failed")]
	AllProcessorsFailed,
}

/// Per-payment processor selection: healthy candidates ordered by
/// observed latency, one charge attempt each.
pub struct DispatchPaymentUseCase<C: ProcessorClient> {
	processors:     Vec<Arc<C>>,
	health_monitor: Arc<HealthMonitor<C>>,
}

// Manual impl: cloning shares the handles and must not require
// `C: Clone`.
impl<C: ProcessorClient> Clone for DispatchPaymentUseCase<C> {
	fn clone(&self) -> Self {
		Self {
			processors:     self.processors.clone(),
			health_monitor: Arc::clone(&self.health_monitor),
		}
	}
}

impl<C: ProcessorClient> DispatchPaymentUseCase<C> {
	pub fn new(
		processors: Vec<Arc<C>>,
		health_monitor: Arc<HealthMonitor<C>>,
	) -> Self {
		Self {
			processors,
			health_monitor,
		}
	}

	pub async fn execute(
		&self,
		payment: &PendingPayment,
	) -> Result<CompletedPayment, DispatchError> {
		let mut candidates: Vec<(Arc<C>, ProcessorHealth)> = self
			.processors
			.iter()
			.filter_map(|processor| {
				self.health_monitor
					.status(processor.kind())
					.filter(ProcessorHealth::is_available)
					.map(|health| (Arc::clone(processor), health))
			})
			.collect();

		if candidates.is_empty() {
			return Err(DispatchError::NoHealthyProcessor);
		}

		// Stable sort; latency ties go to the default processor.
		candidates.sort_by_key(|(processor, health)| {
			(health.min_response_time, processor.kind())
		});

		for (processor, _health) in &candidates {
			match processor.charge(payment).await {
				Ok(processed_at) => {
					return Ok(CompletedPayment {
						correlation_id: payment.correlation_id,
						amount:         payment.amount,
						processor:      processor.kind(),
						processed_at,
					});
				}
				Err(ChargeError::Definitive { status }) => {
					// Definitive means the payment itself was refused;
					// another processor would refuse it too.
					return Err(DispatchError::Definitive { status });
				}
				Err(ChargeError::Transient { reason }) => {
					debug!(
						"Processor {} failed transiently ({reason}), trying \
						 the next candidate",
						processor.kind()
					);
				}
			}
		}

		Err(DispatchError::AllProcessorsFailed)
	}
}
