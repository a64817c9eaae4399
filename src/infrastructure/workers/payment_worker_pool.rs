use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use log::{error, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::domain::payment::PendingPayment;
use crate::domain::processor::ProcessorClient;
use crate::domain::queue::PaymentQueue;
use crate::domain::summary::SummaryStore;
use crate::use_cases::dispatch_payment::{
	DispatchError, DispatchPaymentUseCase,
};

pub const MAX_RETRIES: u32 = 3;
pub const RETRY_BASE_DELAY_SECS: i64 = 10;

/// Fixed set of consumers draining the live queue. Each worker pulls a
/// payment, dispatches it, and routes the outcome to the summary store,
/// the delayed queue, or the dead letter queue.
pub struct PaymentWorkerPool {
	shutdown: watch::Sender<bool>,
	handles:  Mutex<Vec<JoinHandle<()>>>,
}

impl PaymentWorkerPool {
	pub fn start<Q, S, C>(
		concurrency: usize,
		queue: Q,
		store: S,
		dispatcher: DispatchPaymentUseCase<C>,
	) -> Self
	where
		Q: PaymentQueue + Clone,
		S: SummaryStore + Clone,
		C: ProcessorClient,
	{
		let (shutdown, _) = watch::channel(false);

		let handles = (0..concurrency)
			.map(|id| {
				tokio::spawn(payment_worker(
					id,
					queue.clone(),
					store.clone(),
					dispatcher.clone(),
					shutdown.subscribe(),
				))
			})
			.collect();

		info!("Started {concurrency} payment workers");

		Self {
			shutdown,
			handles: Mutex::new(handles),
		}
	}

	pub async fn stop(&self) {
		let _ = self.shutdown.send(true);
		let handles: Vec<_> = self.handles.lock().unwrap().drain(..).collect();
		for handle in handles {
			let _ = handle.await;
		}
	}
}

async fn payment_worker<Q, S, C>(
	id: usize,
	queue: Q,
	store: S,
	dispatcher: DispatchPaymentUseCase<C>,
	shutdown: watch::Receiver<bool>,
) where
	Q: PaymentQueue,
	S: SummaryStore,
	C: ProcessorClient,
{
	// The pop timeout bounds how long shutdown waits on an idle worker.
	while !*shutdown.borrow() {
		match queue.pop().await {
			Ok(Some(payment)) => {
				process_payment(payment, &queue, &store, &dispatcher).await;
			}
			Ok(None) => {}
			Err(e) => {
				error!("Worker {id} failed to pop from the live queue: {e}");
				sleep(Duration::from_secs(1)).await;
			}
		}
	}
	info!("Payment worker {id} stopped");
}

pub async fn process_payment<Q, S, C>(
	mut payment: PendingPayment,
	queue: &Q,
	store: &S,
	dispatcher: &DispatchPaymentUseCase<C>,
) where
	Q: PaymentQueue,
	S: SummaryStore,
	C: ProcessorClient,
{
	if payment.requested_at.is_none() {
		payment.requested_at = Some(Utc::now());
	}

	match dispatcher.execute(&payment).await {
		Ok(completed) => {
			if let Err(e) = store.add(completed).await {
				error!(
					"Failed to record completed payment {}: {e}",
					payment.correlation_id
				);
				schedule_retry(payment, queue).await;
			}
		}
		Err(DispatchError::Definitive { status }) => {
			// The processor rejected the payment itself; retrying or
			// dead lettering it would be wrong.
			warn!(
				"Payment {} rejected with status {status}, dropping it",
				payment.correlation_id
			);
		}
		Err(e) => {
			warn!(
				"Payment {} could not be dispatched ({e}), scheduling a retry",
				payment.correlation_id
			);
			schedule_retry(payment, queue).await;
		}
	}
}

pub async fn schedule_retry<Q: PaymentQueue>(
	mut payment: PendingPayment,
	queue: &Q,
) {
	if payment.retry_count >= MAX_RETRIES {
		warn!(
			"Payment {} exhausted its {MAX_RETRIES} retries, moving it to \
			 the dead letter queue",
			payment.correlation_id
		);
		if let Err(e) = queue.push_dead_letter(&payment).await {
			error!(
				"Failed to dead letter payment {}: {e}",
				payment.correlation_id
			);
		}
		return;
	}

	payment.retry_count += 1;
	let delay = chrono::Duration::seconds(
		RETRY_BASE_DELAY_SECS * i64::from(payment.retry_count),
	);
	let retry_at = Utc::now() + delay;

	if let Err(e) = queue.push_delayed(&payment, retry_at).await {
		error!(
			"Failed to schedule a retry for payment {}: {e}",
			payment.correlation_id
		);
		// Last resort so the payment is not lost; it will retry sooner
		// than scheduled.
		if let Err(e) = queue.push(&payment).await {
			error!(
				"Failed to re-queue payment {}: {e}",
				payment.correlation_id
			);
		}
	}
}
