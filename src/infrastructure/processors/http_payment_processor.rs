use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::health::ProcessorHealth;
use crate::domain::payment::PendingPayment;
use crate::domain::processor::{ChargeError, ProcessorClient, ProcessorKind};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeRequest {
	correlation_id: Uuid,
	amount:         Decimal,
	requested_at:   String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceHealthResponse {
	failing:           bool,
	min_response_time: u64,
}

#[derive(Clone)]
pub struct HttpPaymentProcessor {
	kind:        ProcessorKind,
	base_url:    String,
	http_client: Client,
}

impl HttpPaymentProcessor {
	pub fn new(
		kind: ProcessorKind,
		base_url: impl Into<String>,
		http_client: Client,
	) -> Self {
		Self {
			kind,
			base_url: base_url.into(),
			http_client,
		}
	}
}

fn classify_charge_status(status: StatusCode) -> Result<(), ChargeError> {
	if status.is_success() {
		return Ok(());
	}

	match status.as_u16() {
		// Timeout-ish client statuses clear on their own; retry them.
		408 | 425 | 429 => {
			Err(ChargeError::transient(format!("received status {status}")))
		}
		s if status.is_client_error() => {
			Err(ChargeError::Definitive { status: s })
		}
		_ => Err(ChargeError::transient(format!("received status {status}"))),
	}
}

#[async_trait]
impl ProcessorClient for HttpPaymentProcessor {
	fn kind(&self) -> ProcessorKind {
		self.kind
	}

	async fn charge(
		&self,
		payment: &PendingPayment,
	) -> Result<DateTime<Utc>, ChargeError> {
		let started_at = Utc::now();
		let requested_at = payment.requested_at.unwrap_or(started_at);

		let body = ChargeRequest {
			correlation_id: payment.correlation_id,
			amount:         payment.amount,
			requested_at:   requested_at
				.to_rfc3339_opts(SecondsFormat::Millis, true),
		};

		let response = self
			.http_client
			.post(format!("{}/payments", self.base_url))
			.json(&body)
			.send()
			.await
			.map_err(ChargeError::transient)?;

		classify_charge_status(response.status())?;

		Ok(started_at)
	}

	async fn check_health(
		&self,
	) -> Result<ProcessorHealth, Box<dyn std::error::Error + Send>> {
		let response = self
			.http_client
			.get(format!("{}/payments/service-health", self.base_url))
			.send()
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		if response.status() != StatusCode::OK {
			return Err(Box::new(std::io::Error::other(format!(
				"service health returned status {}",
				response.status()
			))));
		}

		let health: ServiceHealthResponse = response
			.json()
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		Ok(ProcessorHealth {
			failing:           health.failing,
			min_response_time: health.min_response_time,
		})
	}
}
