//! Out-of-band delivery of verification messages.

mod logging;
mod memory;
mod redis_queue;

pub use logging::LogDispatcher;
pub use memory::MemoryDispatcher;
pub use redis_queue::RedisDispatcher;

use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A message handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Fire-and-forget delivery request. Callers bound the call with a timeout.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn notify(&self, address: &str, subject: &str, body: &str) -> AppResult<()>;
}
