use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::domain::queue::PaymentQueue;

const REQUEUE_TICK: Duration = Duration::from_secs(5);
const REQUEUE_BATCH_LIMIT: usize = 100;

/// Promotes matured delayed payments back onto the live queue on a
/// fixed tick. A failed tick is retried on the next one; entries stay
/// in the delayed set until the move succeeds.
pub struct DelayedRequeuer {
	shutdown: watch::Sender<bool>,
	handle:   Mutex<Option<JoinHandle<()>>>,
}

impl DelayedRequeuer {
	pub fn start<Q: PaymentQueue>(queue: Q) -> Self {
		let (shutdown, _) = watch::channel(false);
		let mut shutdown_rx = shutdown.subscribe();

		let handle = tokio::spawn(async move {
			info!("Delayed payment requeuer started");
			loop {
				tokio::select! {
					_ = sleep(REQUEUE_TICK) => {}
					_ = shutdown_rx.changed() => break,
				}

				match queue.promote_due(Utc::now(), REQUEUE_BATCH_LIMIT).await {
					Ok(0) => {}
					Ok(promoted) => {
						info!(
							"Promoted {promoted} delayed payments to the \
							 live queue"
						);
					}
					Err(e) => {
						warn!("Requeue tick failed, retrying next tick: {e}");
					}
				}
			}
			info!("Delayed payment requeuer stopped");
		});

		Self {
			shutdown,
			handle: Mutex::new(Some(handle)),
		}
	}

	pub async fn stop(&self) {
		let _ = self.shutdown.send(true);
		let handle = self.handle.lock().unwrap().take();
		if let Some(handle) = handle {
			let _ = handle.await;
		}
	}
}
