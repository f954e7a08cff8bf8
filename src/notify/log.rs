//! Notifier that only writes to the log

use async_trait::async_trait;
use tracing::{error, info};

use crate::common::errors::Result;
use crate::common::traits::Notifier;

/// Fallback notifier used when no operator channel is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_trade(&self, message: &str) -> Result<()> {
        info!(target: "kalshi_bot::notify", "{}", message);
        Ok(())
    }

    async fn notify_error(&self, message: &str) -> Result<()> {
        error!(target: "kalshi_bot::notify", "{}", message);
        Ok(())
    }
}
