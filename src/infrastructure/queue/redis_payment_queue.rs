use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};

use crate::domain::payment::PendingPayment;
use crate::domain::queue::{PaymentQueue, QueueError};

const POP_TIMEOUT_SECS: f64 = 1.0;

// Refusing the push and reporting busy is the producer's job; doing the
// length check inside Redis keeps it atomic against other producers.
const BOUNDED_PUSH_SCRIPT: &str = r#"
    if redis.call('LLEN', KEYS[1]) >= tonumber(ARGV[2]) then
        return -1
    end
    return redis.call('LPUSH', KEYS[1], ARGV[1])
"#;

#[derive(Clone)]
pub struct RedisPaymentQueue {
	client:          Client,
	live_key:        String,
	delayed_key:     String,
	dead_letter_key: String,
	capacity:        usize,
}

impl RedisPaymentQueue {
	pub fn new(
		client: Client,
		live_key: impl Into<String>,
		delayed_key: impl Into<String>,
		dead_letter_key: impl Into<String>,
		capacity: usize,
	) -> Self {
		Self {
			client,
			live_key: live_key.into(),
			delayed_key: delayed_key.into(),
			dead_letter_key: dead_letter_key.into(),
			capacity,
		}
	}

	async fn connection(&self) -> Result<MultiplexedConnection, QueueError> {
		self.client
			.get_multiplexed_async_connection()
			.await
			.map_err(QueueError::backbone)
	}

	fn encode(payment: &PendingPayment) -> Result<String, QueueError> {
		serde_json::to_string(payment).map_err(QueueError::codec)
	}
}

#[async_trait]
impl PaymentQueue for RedisPaymentQueue {
	async fn push(&self, payment: &PendingPayment) -> Result<(), QueueError> {
		let mut con = self.connection().await?;
		let serialized = Self::encode(payment)?;

		let pushed: i64 = Script::new(BOUNDED_PUSH_SCRIPT)
			.key(&self.live_key)
			.arg(serialized)
			.arg(self.capacity)
			.invoke_async(&mut con)
			.await
			.map_err(QueueError::backbone)?;

		if pushed < 0 {
			return Err(QueueError::Full);
		}

		Ok(())
	}

	async fn pop(&self) -> Result<Option<PendingPayment>, QueueError> {
		let mut con = self.connection().await?;

		let popped: Option<(String, String)> = con
			.brpop(&self.live_key, POP_TIMEOUT_SECS)
			.await
			.map_err(QueueError::backbone)?;

		let Some((_queue_name, serialized)) = popped else {
			return Ok(None);
		};

		let payment: PendingPayment =
			serde_json::from_str(&serialized).map_err(QueueError::codec)?;

		Ok(Some(payment))
	}

	async fn push_delayed(
		&self,
		payment: &PendingPayment,
		retry_at: DateTime<Utc>,
	) -> Result<(), QueueError> {
		let mut con = self.connection().await?;
		let serialized = Self::encode(payment)?;

		let _: () = con
			.zadd(&self.delayed_key, serialized, retry_at.timestamp())
			.await
			.map_err(QueueError::backbone)?;

		Ok(())
	}

	async fn push_dead_letter(
		&self,
		payment: &PendingPayment,
	) -> Result<(), QueueError> {
		let mut con = self.connection().await?;
		let serialized = Self::encode(payment)?;

		let _: () = con
			.lpush(&self.dead_letter_key, serialized)
			.await
			.map_err(QueueError::backbone)?;

		Ok(())
	}

	async fn promote_due(
		&self,
		now: DateTime<Utc>,
		limit: usize,
	) -> Result<usize, QueueError> {
		let mut con = self.connection().await?;

		let due: Vec<String> = con
			.zrangebyscore_limit(
				&self.delayed_key,
				"-inf",
				now.timestamp(),
				0,
				limit as isize,
			)
			.await
			.map_err(QueueError::backbone)?;

		if due.is_empty() {
			return Ok(0);
		}

		// Move and remove in one transaction; a failed tick leaves the
		// entries in the delayed set for the next one.
		let mut pipe = redis::pipe();
		pipe.atomic();
		for member in &due {
			pipe.lpush(&self.live_key, member).ignore();
			pipe.zrem(&self.delayed_key, member).ignore();
		}

		pipe.query_async::<()>(&mut con)
			.await
			.map_err(QueueError::backbone)?;

		Ok(due.len())
	}

	async fn clear(&self) -> Result<(), QueueError> {
		let mut con = self.connection().await?;

		redis::pipe()
			.atomic()
			.del(&self.live_key)
			.ignore()
			.del(&self.delayed_key)
			.ignore()
			.del(&self.dead_letter_key)
			.ignore()
			.query_async::<()>(&mut con)
			.await
			.map_err(QueueError::backbone)?;

		Ok(())
	}
}
