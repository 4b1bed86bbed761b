//! Dispatcher that only records the request in the log.

use async_trait::async_trait;
use tracing::info;

use super::Dispatcher;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

#[async_trait]
impl Dispatcher for LogDispatcher {
    async fn notify(&self, address: &str, subject: &str, _body: &str) -> AppResult<()> {
        info!(to = %address, subject = %subject, "notification not delivered (log backend)");
        Ok(())
    }
}
