use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::derive::{Display, Error};

use crate::domain::payment::PendingPayment;

#[derive(Debug, Display, Error)]
pub enum QueueError {
	#[display("live queue is at capacity")]
	Full,
	#[display("failed to encode or decode a queued payment: {reason}")]
	Codec { reason: String },
	#[display("queue backbone error: {reason}")]
	Backbone { reason: String },
}

impl QueueError {
	pub fn codec(cause: impl std::fmt::Display) -> Self {
		QueueError::Codec {
			reason: cause.to_string(),
		}
	}

	pub fn backbone(cause: impl std::fmt::Display) -> Self {
		QueueError::Backbone {
			reason: cause.to_string(),
		}
	}
}

#[async_trait]
pub trait PaymentQueue: Send + Sync + 'static {
	/// Enqueue onto the live queue. `QueueError::Full` when the bound
	/// is reached; the caller surfaces that as a retryable busy signal.
	async fn push(&self, payment: &PendingPayment) -> Result<(), QueueError>;

	/// Blocking pop from the live queue with a short timeout; `None`
	/// when the queue stayed empty, so callers can observe shutdown.
	async fn pop(&self) -> Result<Option<PendingPayment>, QueueError>;

	async fn push_delayed(
		&self,
		payment: &PendingPayment,
		retry_at: DateTime<Utc>,
	) -> Result<(), QueueError>;

	async fn push_dead_letter(
		&self,
		payment: &PendingPayment,
	) -> Result<(), QueueError>;

	/// Atomically move up to `limit` matured delayed entries onto the
	/// live queue, returning how many were moved.
	async fn promote_due(
		&self,
		now: DateTime<Utc>,
		limit: usize,
	) -> Result<usize, QueueError>;

	async fn clear(&self) -> Result<(), QueueError>;
}
