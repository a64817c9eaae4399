pub mod delayed_requeuer;
pub mod payment_worker_pool;
