//! Redis-backed dispatcher: queues notifications on a list for an external mailer.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use super::{Dispatcher, Notification};
use crate::error::AppResult;

const NOTIFICATION_QUEUE: &str = "authgate:notifications";

#[derive(Clone)]
pub struct RedisDispatcher {
    conn: ConnectionManager,
    queue: String,
}

impl RedisDispatcher {
    /// Connect to Redis at `redis_url`; the manager reconnects on its own after failures.
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            queue: NOTIFICATION_QUEUE.to_string(),
        })
    }
}

#[async_trait]
impl Dispatcher for RedisDispatcher {
    async fn notify(&self, address: &str, subject: &str, body: &str) -> AppResult<()> {
        let payload = serde_json::to_string(&Notification {
            to: address.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        })?;
        let mut conn = self.conn.clone();
        let depth: i64 = conn.rpush(&self.queue, payload).await?;
        debug!(queue = %self.queue, depth, "notification queued");
        Ok(())
    }
}
