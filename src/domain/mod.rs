pub mod health;
pub mod payment;
pub mod processor;
pub mod queue;
pub mod summary;
