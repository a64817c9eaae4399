#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use payment_dispatcher::domain::health::ProcessorHealth;
use payment_dispatcher::domain::payment::{CompletedPayment, PendingPayment};
use payment_dispatcher::domain::processor::{
	ChargeError, ProcessorClient, ProcessorKind,
};
use payment_dispatcher::domain::queue::{PaymentQueue, QueueError};
use payment_dispatcher::domain::summary::{
	PaymentsSummary, ProcessorSummary, SummaryStore, SummaryStoreError,
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub enum ChargeBehavior {
	Succeed,
	FailTransient,
	FailDefinitive(u16),
}

/// Processor double with programmable charge outcomes and an optional
/// canned health probe result.
pub struct FakeProcessor {
	kind:             ProcessorKind,
	scripted:         Mutex<VecDeque<ChargeBehavior>>,
	default_behavior: ChargeBehavior,
	health:           Mutex<Option<ProcessorHealth>>,
	charge_calls:     AtomicUsize,
}

impl FakeProcessor {
	pub fn new(kind: ProcessorKind, default_behavior: ChargeBehavior) -> Self {
		Self {
			kind,
			scripted: Mutex::new(VecDeque::new()),
			default_behavior,
			health: Mutex::new(None),
			charge_calls: AtomicUsize::new(0),
		}
	}

	pub fn with_health(
		kind: ProcessorKind,
		default_behavior: ChargeBehavior,
		health: ProcessorHealth,
	) -> Self {
		let fake = Self::new(kind, default_behavior);
		*fake.health.lock().unwrap() = Some(health);
		fake
	}

	pub fn script_charges(
		&self,
		behaviors: impl IntoIterator<Item = ChargeBehavior>,
	) {
		self.scripted.lock().unwrap().extend(behaviors);
	}

	pub fn charge_calls(&self) -> usize {
		self.charge_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ProcessorClient for FakeProcessor {
	fn kind(&self) -> ProcessorKind {
		self.kind
	}

	async fn charge(
		&self,
		_payment: &PendingPayment,
	) -> Result<DateTime<Utc>, ChargeError> {
		self.charge_calls.fetch_add(1, Ordering::SeqCst);

		let behavior = self
			.scripted
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or(self.default_behavior);

		match behavior {
			ChargeBehavior::Succeed => Ok(Utc::now()),
			ChargeBehavior::FailTransient => {
				Err(ChargeError::transient("injected transient failure"))
			}
			ChargeBehavior::FailDefinitive(status) => {
				Err(ChargeError::Definitive { status })
			}
		}
	}

	async fn check_health(
		&self,
	) -> Result<ProcessorHealth, Box<dyn std::error::Error + Send>> {
		match self.health.lock().unwrap().clone() {
			Some(health) => Ok(health),
			None => Err(Box::new(std::io::Error::other(
				"injected health probe failure",
			)) as Box<dyn std::error::Error + Send>),
		}
	}
}

#[derive(Default)]
pub struct QueueState {
	pub live:        VecDeque<String>,
	pub delayed:     Vec<(i64, String)>,
	pub dead_letter: Vec<String>,
}

/// Queue double backed by the same serialized representation the Redis
/// queue uses, so serialization behavior is exercised too.
#[derive(Clone, Default)]
pub struct InMemoryQueue {
	state:    Arc<Mutex<QueueState>>,
	capacity: Option<usize>,
}

impl InMemoryQueue {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn bounded(capacity: usize) -> Self {
		Self {
			state:    Arc::new(Mutex::new(QueueState::default())),
			capacity: Some(capacity),
		}
	}

	pub fn live_payments(&self) -> Vec<PendingPayment> {
		self.state
			.lock()
			.unwrap()
			.live
			.iter()
			.map(|raw| serde_json::from_str(raw).unwrap())
			.collect()
	}

	pub fn delayed_entries(&self) -> Vec<(i64, PendingPayment)> {
		self.state
			.lock()
			.unwrap()
			.delayed
			.iter()
			.map(|(score, raw)| (*score, serde_json::from_str(raw).unwrap()))
			.collect()
	}

	pub fn dead_letter_payments(&self) -> Vec<PendingPayment> {
		self.state
			.lock()
			.unwrap()
			.dead_letter
			.iter()
			.map(|raw| serde_json::from_str(raw).unwrap())
			.collect()
	}
}

#[async_trait]
impl PaymentQueue for InMemoryQueue {
	async fn push(&self, payment: &PendingPayment) -> Result<(), QueueError> {
		let mut state = self.state.lock().unwrap();
		if let Some(capacity) = self.capacity &&
			state.live.len() >= capacity
		{
			return Err(QueueError::Full);
		}

		let serialized =
			serde_json::to_string(payment).map_err(QueueError::codec)?;
		state.live.push_front(serialized);
		Ok(())
	}

	async fn pop(&self) -> Result<Option<PendingPayment>, QueueError> {
		let popped = self.state.lock().unwrap().live.pop_back();
		let Some(serialized) = popped else {
			// Mirror the blocking pop timeout so callers do not spin.
			tokio::time::sleep(std::time::Duration::from_millis(20)).await;
			return Ok(None);
		};

		serde_json::from_str(&serialized)
			.map(Some)
			.map_err(QueueError::codec)
	}

	async fn push_delayed(
		&self,
		payment: &PendingPayment,
		retry_at: DateTime<Utc>,
	) -> Result<(), QueueError> {
		let serialized =
			serde_json::to_string(payment).map_err(QueueError::codec)?;
		self.state
			.lock()
			.unwrap()
			.delayed
			.push((retry_at.timestamp(), serialized));
		Ok(())
	}

	async fn push_dead_letter(
		&self,
		payment: &PendingPayment,
	) -> Result<(), QueueError> {
		let serialized =
			serde_json::to_string(payment).map_err(QueueError::codec)?;
		self.state.lock().unwrap().dead_letter.push(serialized);
		Ok(())
	}

	async fn promote_due(
		&self,
		now: DateTime<Utc>,
		limit: usize,
	) -> Result<usize, QueueError> {
		let mut state = self.state.lock().unwrap();
		let state = &mut *state;
		let now_ts = now.timestamp();

		let mut promoted = 0;
		let mut remaining = Vec::new();
		for (score, serialized) in state.delayed.drain(..) {
			if score <= now_ts && promoted < limit {
				state.live.push_front(serialized);
				promoted += 1;
			} else {
				remaining.push((score, serialized));
			}
		}
		state.delayed = remaining;

		Ok(promoted)
	}

	async fn clear(&self) -> Result<(), QueueError> {
		let mut state = self.state.lock().unwrap();
		state.live.clear();
		state.delayed.clear();
		state.dead_letter.clear();
		Ok(())
	}
}

/// Summary store double with first-write-wins semantics, mirroring the
/// member uniqueness the Redis sorted set provides.
#[derive(Clone, Default)]
pub struct InMemorySummaryStore {
	entries:   Arc<Mutex<HashMap<(ProcessorKind, Uuid), CompletedPayment>>>,
	fail_adds: Arc<AtomicBool>,
}

impl InMemorySummaryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn fail_adds(&self, fail: bool) {
		self.fail_adds.store(fail, Ordering::SeqCst);
	}

	pub fn completed_payments(&self) -> Vec<CompletedPayment> {
		self.entries.lock().unwrap().values().cloned().collect()
	}
}

#[async_trait]
impl SummaryStore for InMemorySummaryStore {
	async fn add(
		&self,
		payment: CompletedPayment,
	) -> Result<(), SummaryStoreError> {
		if self.fail_adds.load(Ordering::SeqCst) {
			return Err(SummaryStoreError::new("injected store failure"));
		}

		self.entries
			.lock()
			.unwrap()
			.entry((payment.processor, payment.correlation_id))
			.or_insert(payment);
		Ok(())
	}

	async fn get(
		&self,
		from_ms: Option<i64>,
		to_ms: Option<i64>,
	) -> Result<PaymentsSummary, SummaryStoreError> {
		let mut summary = PaymentsSummary::default();

		for payment in self.entries.lock().unwrap().values() {
			let processed_ms = payment.processed_at.timestamp_millis();
			if from_ms.is_some_and(|from| processed_ms < from) ||
				to_ms.is_some_and(|to| processed_ms > to)
			{
				continue;
			}

			let bucket: &mut ProcessorSummary = match payment.processor {
				ProcessorKind::Default => &mut summary.default,
				ProcessorKind::Fallback => &mut summary.fallback,
			};
			bucket.total_requests += 1;
			bucket.total_amount += payment.amount;
		}

		Ok(summary)
	}

	async fn clear(&self) -> Result<(), SummaryStoreError> {
		self.entries.lock().unwrap().clear();
		Ok(())
	}
}
