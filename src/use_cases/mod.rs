pub mod dispatch_payment;
pub mod dto;
pub mod get_payments_summary;
pub mod purge_payments;
pub mod submit_payment;
