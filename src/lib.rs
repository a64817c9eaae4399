use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::info;
use reqwest::Client;

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod use_cases;

use crate::adapters::web::handlers::{
	payments, payments_purge, payments_summary,
};
use crate::domain::processor::ProcessorKind;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::health::processor_health_monitor::HealthMonitor;
use crate::infrastructure::persistence::redis_summary_store::RedisSummaryStore;
use crate::infrastructure::processors::http_payment_processor::HttpPaymentProcessor;
use crate::infrastructure::queue::redis_payment_queue::RedisPaymentQueue;
use crate::infrastructure::workers::delayed_requeuer::DelayedRequeuer;
use crate::infrastructure::workers::payment_worker_pool::PaymentWorkerPool;
use crate::use_cases::dispatch_payment::DispatchPaymentUseCase;
use crate::use_cases::get_payments_summary::GetPaymentsSummaryUseCase;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;
use crate::use_cases::submit_payment::SubmitPaymentUseCase;

const LIVE_QUEUE_CAPACITY: usize = 50_000;
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
const HTTP_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 50;

pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	env_logger::init();

	let redis_client =
		redis::Client::open(config.redis_url.clone()).expect("Invalid Redis URL");

	let http_client = Client::builder()
		.timeout(HTTP_REQUEST_TIMEOUT)
		.pool_idle_timeout(HTTP_POOL_IDLE_TIMEOUT)
		.pool_max_idle_per_host(HTTP_POOL_MAX_IDLE_PER_HOST)
		.build()
		.expect("Failed to build HTTP client");

	let processors = vec![
		Arc::new(HttpPaymentProcessor::new(
			ProcessorKind::Default,
			config.processor_default_url.clone(),
			http_client.clone(),
		)),
		Arc::new(HttpPaymentProcessor::new(
			ProcessorKind::Fallback,
			config.processor_fallback_url.clone(),
			http_client.clone(),
		)),
	];

	info!("Starting health monitor...");
	let health_monitor = Arc::new(HealthMonitor::new(processors.clone()));
	health_monitor.start();

	let payment_queue = RedisPaymentQueue::new(
		redis_client.clone(),
		config.live_queue_name(),
		config.redis_delayed_queue_name.clone(),
		config.redis_dead_letter_queue_name.clone(),
		LIVE_QUEUE_CAPACITY,
	);
	let summary_store = RedisSummaryStore::new(redis_client.clone());

	let dispatcher =
		DispatchPaymentUseCase::new(processors, Arc::clone(&health_monitor));

	info!("Starting payment workers...");
	let worker_pool = PaymentWorkerPool::start(
		config.worker_concurrency,
		payment_queue.clone(),
		summary_store.clone(),
		dispatcher,
	);

	info!("Starting delayed payment requeuer...");
	let requeuer = DelayedRequeuer::start(payment_queue.clone());

	let submit_payment_use_case =
		SubmitPaymentUseCase::new(payment_queue.clone());
	let get_payments_summary_use_case =
		GetPaymentsSummaryUseCase::new(summary_store.clone());
	let purge_payments_use_case =
		PurgePaymentsUseCase::new(payment_queue.clone(), summary_store.clone());

	info!("Starting HTTP server on 0.0.0.0:{}...", config.app_port);

	let server_result = HttpServer::new(move || {
		App::new()
			.app_data(web::Data::new(submit_payment_use_case.clone()))
			.app_data(web::Data::new(get_payments_summary_use_case.clone()))
			.app_data(web::Data::new(purge_payments_use_case.clone()))
			.service(payments)
			.service(payments_summary)
			.service(payments_purge)
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.bind(("0.0.0.0", config.app_port))?
	.run()
	.await;

	// The ingress is down, so no new work arrives; drain the workers
	// before stopping the auxiliary tasks.
	info!("Ingress stopped, draining background tasks...");
	worker_pool.stop().await;
	requeuer.stop().await;
	health_monitor.stop().await;

	server_result
}
