use actix_web::{HttpResponse, Responder, ResponseError, get, web};
use log::warn;

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::PaymentsSummaryFilter;
use crate::use_cases::dto::GetPaymentsSummaryQuery;
use crate::use_cases::get_payments_summary::GetPaymentsSummaryUseCase;

fn to_epoch_millis(dt: time::OffsetDateTime) -> i64 {
	(dt.unix_timestamp_nanos() / 1_000_000) as i64
}

#[get("/payments-summary")]
pub async fn payments_summary(
	filter: web::Query<PaymentsSummaryFilter>,
	get_payments_summary_use_case: web::Data<GetPaymentsSummaryUseCase<crate::infrastructure::persistence::redis_summary_store::RedisSummaryStore>>,
) -> impl Responder {
	let query = GetPaymentsSummaryQuery {
		from_ms: filter.from.map(to_epoch_millis),
		to_ms:   filter.to.map(to_epoch_millis),
	};

	match get_payments_summary_use_case.execute(query).await {
		Ok(summary) => HttpResponse::Ok().json(summary),
		Err(e) => {
			warn!("Error getting payments summary: {e:?}");
			ApiError::InternalServerError.error_response()
		}
	}
}
