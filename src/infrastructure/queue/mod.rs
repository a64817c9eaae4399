pub mod redis_payment_queue;
