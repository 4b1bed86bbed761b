//! Dispatcher that keeps every notification in memory, for tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{Dispatcher, Notification};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Behavior {
    #[default]
    Deliver,
    Fail,
    Stall,
}

#[derive(Clone, Default)]
pub struct MemoryDispatcher {
    sent: Arc<Mutex<Vec<Notification>>>,
    behavior: Behavior,
}

impl MemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose every call fails, as an unreachable mailer would.
    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
            ..Self::default()
        }
    }

    /// A dispatcher whose calls never complete, as a hung mailer would.
    pub fn stalled() -> Self {
        Self {
            behavior: Behavior::Stall,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }

    pub async fn last(&self) -> Option<Notification> {
        self.sent.lock().await.last().cloned()
    }
}

#[async_trait]
impl Dispatcher for MemoryDispatcher {
    async fn notify(&self, address: &str, subject: &str, body: &str) -> AppResult<()> {
        match self.behavior {
            Behavior::Deliver => {}
            Behavior::Fail => {
                return Err(AppError::Internal(anyhow::anyhow!("dispatcher unavailable")));
            }
            Behavior::Stall => std::future::pending::<()>().await,
        }
        self.sent.lock().await.push(Notification {
            to: address.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
