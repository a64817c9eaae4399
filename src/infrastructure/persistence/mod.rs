pub mod redis_summary_store;
