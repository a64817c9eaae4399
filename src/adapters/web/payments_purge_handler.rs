use actix_web::{HttpResponse, Responder, ResponseError, post, web};
use log::{info, warn};

use crate::adapters::web::errors::ApiError;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

#[post("/purge-payments")]
pub async fn payments_purge(
	purge_payments_use_case: web::Data<
		PurgePaymentsUseCase<
			crate::infrastructure::queue::redis_payment_queue::RedisPaymentQueue,
			crate::infrastructure::persistence::redis_summary_store::RedisSummaryStore,
		>,
	>,
) -> impl Responder {
	match purge_payments_use_case.execute().await {
		Ok(_) => {
			info!("Purged recorded payments and queues");
			HttpResponse::Ok().finish()
		}
		Err(e) => {
			warn!("Error purging payments: {e:?}");
			ApiError::InternalServerError.error_response()
		}
	}
}
