use async_trait::async_trait;
use chrono::Utc;
use std::time;

const DEFAULT_RETENTION: time::Duration = time::Duration::from_secs(7 * 24 * 60 * 60);

#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("Failed to reach the delivery ledger.")]
    Unavailable(#[from] redis::RedisError),
}

/// Remembers which trigger events already produced a notification attempt, so
/// a redelivered event is not sent twice.
#[async_trait]
pub trait DeliveryLedger: Send + Sync {
    /// Records `event_id` and returns true when this is the first time it is
    /// seen.
    async fn record_first_delivery(&self, event_id: &str) -> Result<bool, LedgerError>;
}

pub struct RedisLedger {
    redis_client: redis::Client,
    retention: time::Duration,
}

impl RedisLedger {
    pub fn new(redis_client: redis::Client, retention: Option<time::Duration>) -> RedisLedger {
        RedisLedger {
            redis_client,
            retention: retention.unwrap_or(DEFAULT_RETENTION),
        }
    }
}

fn delivery_key(event_id: &str) -> String {
    format!("acceptance_notification:{}:notified_at", event_id)
}

#[async_trait]
impl DeliveryLedger for RedisLedger {
    #[tracing::instrument(name = "Record a trigger event in Redis", skip(self))]
    async fn record_first_delivery(&self, event_id: &str) -> Result<bool, LedgerError> {
        let mut redis_conn = self.redis_client.get_tokio_connection().await?;

        let reply: redis::Value = redis::cmd("SET")
            .arg(delivery_key(event_id))
            .arg(Utc::now().to_rfc3339())
            .arg("NX")
            .arg("EX")
            .arg(self.retention.as_secs())
            .query_async(&mut redis_conn)
            .await?;

        Ok(is_first_delivery(&reply))
    }
}

/// SET NX replies OK when the key was written and nil when it already existed.
fn is_first_delivery(reply: &redis::Value) -> bool {
    matches!(reply, redis::Value::Okay | redis::Value::Status(_))
}
