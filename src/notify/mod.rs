//! Operator notification channels

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::common::errors::Result;
use crate::common::traits::Notifier;
use crate::config::types::AppConfig;

pub mod log;
pub mod telegram;

pub use self::log::LogNotifier;
pub use self::telegram::TelegramNotifier;

/// Shared notifier handle, used by both the executor and the scheduler
pub type SharedNotifier = Arc<dyn Notifier>;

/// Build the notifier for the given configuration
///
/// Telegram when configured, otherwise log output only.
pub fn build_notifier(config: &AppConfig) -> Result<SharedNotifier> {
    match &config.telegram {
        Some(telegram) => {
            let timeout = Duration::from_secs(config.settings.request_timeout_seconds);
            info!("Telegram notifications enabled for chat {}", telegram.chat_id);
            Ok(Arc::new(TelegramNotifier::new(telegram, timeout)?))
        }
        None => {
            info!("Telegram not configured, notifications go to the log");
            Ok(Arc::new(LogNotifier))
        }
    }
}
