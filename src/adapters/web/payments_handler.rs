use actix_web::{HttpResponse, Responder, ResponseError, post, web};
use log::{debug, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::PaymentRequest;
use crate::use_cases::dto::SubmitPaymentCommand;
use crate::use_cases::submit_payment::{
	SubmitPaymentError, SubmitPaymentUseCase,
};

#[post("/payments")]
pub async fn payments(
	payload: web::Json<PaymentRequest>,
	submit_payment_use_case: web::Data<
		SubmitPaymentUseCase<
			crate::infrastructure::queue::redis_payment_queue::RedisPaymentQueue,
		>,
	>,
) -> impl Responder {
	let command = SubmitPaymentCommand {
		correlation_id: payload.correlation_id,
		amount:         payload.amount,
	};

	match submit_payment_use_case.execute(command).await {
		Ok(_) => {
			debug!("Payment accepted and queued: {}", payload.correlation_id);
			HttpResponse::Accepted().finish()
		}
		Err(
			e @ (SubmitPaymentError::InvalidCorrelationId |
			SubmitPaymentError::InvalidAmount),
		) => {
			warn!("Rejected payment {}: {e}", payload.correlation_id);
			ApiError::BadClientDataError.error_response()
		}
		Err(SubmitPaymentError::Busy) => {
			warn!(
				"Live queue at capacity, rejecting payment {}",
				payload.correlation_id
			);
			ApiError::BusyError.error_response()
		}
		Err(e) => {
			warn!("Error accepting payment: {e:?}");
			ApiError::InternalServerError.error_response()
		}
	}
}
