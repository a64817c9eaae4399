pub mod config;
pub mod health;
pub mod persistence;
pub mod processors;
pub mod queue;
pub mod workers;
