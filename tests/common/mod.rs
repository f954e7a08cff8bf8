//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use kalshi_bot::{BotError, MarketDataSource, MarketRecord, MarketSnapshot, Notifier, Result};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Notifier that records every message it is asked to deliver
#[derive(Default)]
pub struct RecordingNotifier {
    trades: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    fail_delivery: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records messages but reports every delivery as failed
    pub fn failing() -> Self {
        Self {
            fail_delivery: true,
            ..Self::default()
        }
    }

    pub fn trades(&self) -> Vec<String> {
        self.trades.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<()> {
        if self.fail_delivery {
            Err(BotError::Notification("operator channel down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_trade(&self, message: &str) -> Result<()> {
        self.trades.lock().unwrap().push(message.to_string());
        self.outcome()
    }

    async fn notify_error(&self, message: &str) -> Result<()> {
        self.errors.lock().unwrap().push(message.to_string());
        self.outcome()
    }
}

/// Market data source that replays a fixed script, one entry per fetch
///
/// Once the script runs out, every further fetch returns `Ok(None)`.
pub struct ScriptedSource {
    script: Mutex<Vec<Result<Option<MarketSnapshot>>>>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(mut script: Vec<Result<Option<MarketSnapshot>>>) -> Self {
        script.reverse();
        Self {
            script: Mutex::new(script),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for ScriptedSource {
    async fn fetch_snapshot(&self) -> Result<Option<MarketSnapshot>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop().unwrap_or(Ok(None))
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// Two-market snapshot used across tests
pub static SAMPLE_SNAPSHOT: Lazy<MarketSnapshot> = Lazy::new(|| {
    MarketSnapshot::new(vec![
        MarketRecord::new("TEST_MARKET", dec!(0.65)),
        MarketRecord::new("OTHER_MARKET", dec!(0.35)),
    ])
});

/// Sample API responses for testing
pub mod api_responses {
    /// Markets listing as returned by the Kalshi trade API
    pub const MARKETS: &str = r#"{
        "markets": [
            {
                "id": "TEST_MARKET",
                "title": "Test Market",
                "yes_price": 0.65,
                "no_price": 0.35,
                "current_price": 0.65
            }
        ]
    }"#;

    /// Markets listing where only the first record is well formed
    pub const MARKETS_WITH_MALFORMED_RECORDS: &str = r#"{
        "markets": [
            {"id": "TEST_MARKET", "title": "Test Market", "current_price": 0.65},
            {"id": "OTHER_MARKET", "current_price": "n/a"},
            {"id": 7, "current_price": null}
        ]
    }"#;

    /// Markets listing with nothing open
    pub const EMPTY_MARKETS: &str = r#"{"markets": []}"#;

    /// Successful Telegram sendMessage response
    pub const TELEGRAM_OK: &str = r#"{"ok": true, "result": {"message_id": 1}}"#;

    /// Telegram response for a chat the bot cannot reach
    pub const TELEGRAM_REJECTED: &str =
        r#"{"ok": false, "description": "Bad Request: chat not found"}"#;
}
