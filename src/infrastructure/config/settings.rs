use config::Environment;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub app_port: u16,
	pub redis_url: String,
	pub instance_id: String,
	pub processor_default_url: String,
	pub processor_fallback_url: String,
	pub worker_concurrency: usize,
	#[serde(default)]
	pub redis_queue_name: Option<String>,
	#[serde(default = "default_delayed_queue_name")]
	pub redis_delayed_queue_name: String,
	#[serde(default = "default_dead_letter_queue_name")]
	pub redis_dead_letter_queue_name: String,
	#[serde(default = "default_server_keepalive")]
	pub server_keepalive: u64,
}

fn default_delayed_queue_name() -> String {
	"payments_queue_delayed".to_string()
}

fn default_dead_letter_queue_name() -> String {
	"payments_queue_dead-letter".to_string()
}

fn default_server_keepalive() -> u64 {
	75
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		Self::load_from(Environment::default())
	}

	fn load_from(environment: Environment) -> Result<Self, config::ConfigError> {
		let config_builder =
			config::Config::builder().add_source(environment).build()?;

		config_builder.try_deserialize()
	}

	/// Each instance drains its own live queue; the summary series and
	/// the retry queues are shared.
	pub fn live_queue_name(&self) -> String {
		self.redis_queue_name
			.clone()
			.unwrap_or_else(|| format!("payments_queue:{}", self.instance_id))
	}
}
