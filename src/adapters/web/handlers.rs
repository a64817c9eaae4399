pub use crate::adapters::web::payments_handler::payments;
pub use crate::adapters::web::payments_purge_handler::payments_purge;
pub use crate::adapters::web::payments_summary_handler::payments_summary;
