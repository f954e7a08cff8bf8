//! Telegram Bot API notifier

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::common::errors::{BotError, Result};
use crate::common::traits::Notifier;
use crate::config::types::{TelegramConfig, REDACTED};

/// Delivers operator messages to a Telegram chat via `sendMessage`
#[derive(Clone)]
pub struct TelegramNotifier {
    http: Client,
    api_url: String,
    bot_token: String,
    chat_id: i64,
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_url", &self.api_url)
            .field("bot_token", &REDACTED)
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Internal(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id,
        })
    }

    #[instrument(skip(self, text), fields(chat_id = self.chat_id))]
    async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);
        let response = self
            .http
            .post(&url)
            .json(&SendMessageRequest {
                chat_id: self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| BotError::Notification(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Notification(format!(
                "Telegram returned status {}: {}",
                status, body
            )));
        }

        let body: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| BotError::Notification(e.without_url().to_string()))?;
        if !body.ok {
            return Err(BotError::Notification(
                body.description
                    .unwrap_or_else(|| "Telegram rejected the message".to_string()),
            ));
        }

        debug!("Delivered Telegram message");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify_trade(&self, message: &str) -> Result<()> {
        self.send_message(message).await
    }

    async fn notify_error(&self, message: &str) -> Result<()> {
        self.send_message(&format!("Error: {}", message)).await
    }
}
