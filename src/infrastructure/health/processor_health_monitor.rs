use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use log::{error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::domain::health::ProcessorHealth;
use crate::domain::processor::{ProcessorClient, ProcessorKind};

// The processors rate-limit their own health endpoint to one call
// every 5 seconds.
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Periodically polls every processor's self-health endpoint and caches
/// the result. Readers take cheap snapshots; a processor stays unknown
/// until its first poll completes.
pub struct HealthMonitor<C: ProcessorClient> {
	processors:  Vec<Arc<C>>,
	cache:       Arc<RwLock<HashMap<ProcessorKind, ProcessorHealth>>>,
	shutdown:    watch::Sender<bool>,
	poll_handle: Mutex<Option<JoinHandle<()>>>,
}

impl<C: ProcessorClient> HealthMonitor<C> {
	pub fn new(processors: Vec<Arc<C>>) -> Self {
		let (shutdown, _) = watch::channel(false);
		Self {
			processors,
			cache: Arc::new(RwLock::new(HashMap::new())),
			shutdown,
			poll_handle: Mutex::new(None),
		}
	}

	pub fn status(&self, kind: ProcessorKind) -> Option<ProcessorHealth> {
		self.cache.read().unwrap().get(&kind).cloned()
	}

	pub fn update_status(&self, kind: ProcessorKind, health: ProcessorHealth) {
		self.cache.write().unwrap().insert(kind, health);
	}

	pub fn start(&self) {
		let mut poll_handle = self.poll_handle.lock().unwrap();
		if poll_handle.is_some() {
			return;
		}

		let processors = self.processors.clone();
		let cache = Arc::clone(&self.cache);
		let mut shutdown = self.shutdown.subscribe();

		*poll_handle = Some(tokio::spawn(async move {
			info!("Health monitor started");
			loop {
				poll_processors(&processors, &cache).await;
				tokio::select! {
					_ = sleep(HEALTH_POLL_INTERVAL) => {}
					_ = shutdown.changed() => break,
				}
			}
			info!("Health monitor stopped");
		}));
	}

	pub async fn stop(&self) {
		let _ = self.shutdown.send(true);
		let poll_handle = self.poll_handle.lock().unwrap().take();
		if let Some(poll_handle) = poll_handle {
			let _ = poll_handle.await;
		}
	}
}

async fn poll_processors<C: ProcessorClient>(
	processors: &[Arc<C>],
	cache: &RwLock<HashMap<ProcessorKind, ProcessorHealth>>,
) {
	for processor in processors {
		let health = match processor.check_health().await {
			Ok(health) => health,
			Err(e) => {
				error!("Health check for {} failed: {e}", processor.kind());
				ProcessorHealth {
					failing:           true,
					min_response_time: 0,
				}
			}
		};

		cache.write().unwrap().insert(processor.kind(), health);
	}
}
