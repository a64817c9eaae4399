use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::domain::health::ProcessorHealth;
use crate::domain::payment::PendingPayment;

#[derive(
	Debug,
	Deserialize,
	Serialize,
	Display,
	Clone,
	Copy,
	PartialEq,
	Eq,
	PartialOrd,
	Ord,
	Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorKind {
	// Variant order is load-bearing: ties on observed latency resolve
	// to the cheaper default processor.
	#[display("default")]
	Default,
	#[display("fallback")]
	Fallback,
}

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ChargeError {
	#[display("transient processor failure: {reason}")]
	Transient { reason: String },
	#[display("payment rejected with status {status}")]
	Definitive { status: u16 },
}

impl ChargeError {
	pub fn transient(reason: impl std::fmt::Display) -> Self {
		ChargeError::Transient {
			reason: reason.to_string(),
		}
	}

	pub fn is_transient(&self) -> bool {
		matches!(self, ChargeError::Transient { .. })
	}
}

#[async_trait]
pub trait ProcessorClient: Send + Sync + 'static {
	fn kind(&self) -> ProcessorKind;

	/// On success returns the instant observed at request start, which
	/// becomes the completed payment's `processed_at`.
	async fn charge(
		&self,
		payment: &PendingPayment,
	) -> Result<DateTime<Utc>, ChargeError>;

	async fn check_health(
		&self,
	) -> Result<ProcessorHealth, Box<dyn std::error::Error + Send>>;
}
