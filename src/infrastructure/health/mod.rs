pub mod processor_health_monitor;
