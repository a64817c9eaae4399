use derive_more::derive::{Display, Error};
use rust_decimal::Decimal;

use crate::domain::payment::PendingPayment;
use crate::domain::queue::{PaymentQueue, QueueError};
use crate::use_cases::dto::SubmitPaymentCommand;

#[derive(Debug, Display, Error)]
pub enum SubmitPaymentError {
	#[display("correlation id must not be empty")]
	InvalidCorrelationId,
	#[display("amount must be greater than zero")]
	InvalidAmount,
	#[display("live queue is at capacity")]
	Busy,
	#[display("{_0}")]
	Queue(QueueError),
}

#[derive(Clone)]
pub struct SubmitPaymentUseCase<Q: PaymentQueue> {
	payment_queue: Q,
}

impl<Q: PaymentQueue> SubmitPaymentUseCase<Q> {
	pub fn new(payment_queue: Q) -> Self {
		Self { payment_queue }
	}

	pub async fn execute(
		&self,
		command: SubmitPaymentCommand,
	) -> Result<(), SubmitPaymentError> {
		if command.correlation_id.is_nil() {
			return Err(SubmitPaymentError::InvalidCorrelationId);
		}
		if command.amount <= Decimal::ZERO {
			return Err(SubmitPaymentError::InvalidAmount);
		}

		let payment =
			PendingPayment::new(command.correlation_id, command.amount);

		self.payment_queue.push(&payment).await.map_err(|e| match e {
			QueueError::Full => SubmitPaymentError::Busy,
			other => SubmitPaymentError::Queue(other),
		})
	}
}
