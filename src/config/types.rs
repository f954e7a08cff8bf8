//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::common::errors::{BotError, Result};

/// Stand-in for secrets in `Debug` output
pub(crate) const REDACTED: &str = "<redacted>";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Kalshi-specific configuration
    #[serde(default)]
    pub kalshi: KalshiConfig,
    /// Telegram notification channel (optional, falls back to log output)
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    /// Position sizing and scheduling parameters
    #[serde(default)]
    pub trading: TradingConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Check every option for a usable value
    pub fn validate(&self) -> Result<()> {
        self.kalshi.validate()?;
        if let Some(telegram) = &self.telegram {
            telegram.validate()?;
        }
        self.trading.validate()?;
        self.settings.validate()
    }
}

/// Kalshi platform configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct KalshiConfig {
    /// API key, sent as a bearer token when present
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for the trade REST API
    #[serde(default = "default_kalshi_base_url")]
    pub base_url: String,
}

impl Default for KalshiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_kalshi_base_url(),
        }
    }
}

impl fmt::Debug for KalshiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KalshiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl KalshiConfig {
    fn validate(&self) -> Result<()> {
        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                return Err(BotError::Configuration(
                    "Invalid API key provided".to_string(),
                ));
            }
        }
        validate_url("kalshi.base_url", &self.base_url)
    }
}

fn default_kalshi_base_url() -> String {
    "https://trading-api.kalshi.com/trade-api/v2".to_string()
}

/// Telegram bot configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: String,
    /// Numeric chat to deliver messages to
    pub chat_id: i64,
    /// Base URL of the Bot API
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &REDACTED)
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl TelegramConfig {
    fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            return Err(BotError::Configuration(
                "Invalid Telegram bot token provided".to_string(),
            ));
        }
        validate_url("telegram.api_url", &self.api_url)
    }
}

pub(crate) fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

/// What the scheduler does after a cycle fails to fetch market data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceErrorPolicy {
    /// Report and try again on the next interval
    #[default]
    Continue,
    /// Report and wait exponentially longer after each consecutive failure
    Backoff,
    /// Report and stop the trading loop
    Stop,
}

/// Trading parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Total capital available for position sizing
    #[serde(default = "default_bankroll")]
    pub bankroll: Decimal,
    /// Seconds between trading cycles
    #[serde(default = "default_trade_interval")]
    pub trade_interval_seconds: u64,
    /// Fraction of bankroll a single trade may be worth
    #[serde(default = "default_max_position_size_percentage")]
    pub max_position_size_percentage: Decimal,
    /// Reserved for stop-loss handling, not acted on yet
    #[serde(default = "default_stop_loss_percentage")]
    pub stop_loss_percentage: Decimal,
    /// Reaction to market data failures
    #[serde(default)]
    pub on_data_source_error: DataSourceErrorPolicy,
    /// Upper bound on the backoff delay in seconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_seconds: u64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            bankroll: default_bankroll(),
            trade_interval_seconds: default_trade_interval(),
            max_position_size_percentage: default_max_position_size_percentage(),
            stop_loss_percentage: default_stop_loss_percentage(),
            on_data_source_error: DataSourceErrorPolicy::default(),
            max_backoff_seconds: default_max_backoff(),
        }
    }
}

impl TradingConfig {
    fn validate(&self) -> Result<()> {
        if self.bankroll <= Decimal::ZERO {
            return Err(BotError::Configuration(format!(
                "bankroll must be positive, got {}",
                self.bankroll
            )));
        }
        if self.trade_interval_seconds == 0 {
            return Err(BotError::Configuration(
                "trade_interval_seconds must be greater than zero".to_string(),
            ));
        }
        let fraction = self.max_position_size_percentage;
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(BotError::Configuration(format!(
                "max_position_size_percentage must be in (0, 1], got {}",
                fraction
            )));
        }
        let stop_loss = self.stop_loss_percentage;
        if stop_loss < Decimal::ZERO || stop_loss > Decimal::ONE {
            return Err(BotError::Configuration(format!(
                "stop_loss_percentage must be in [0, 1], got {}",
                stop_loss
            )));
        }
        if self.max_backoff_seconds < self.trade_interval_seconds {
            return Err(BotError::Configuration(format!(
                "max_backoff_seconds ({}) is shorter than trade_interval_seconds ({})",
                self.max_backoff_seconds, self.trade_interval_seconds
            )));
        }
        Ok(())
    }
}

fn default_bankroll() -> Decimal {
    dec!(1000)
}

fn default_trade_interval() -> u64 {
    60
}

fn default_max_position_size_percentage() -> Decimal {
    dec!(0.1)
}

fn default_stop_loss_percentage() -> Decimal {
    dec!(0.05)
}

fn default_max_backoff() -> u64 {
    600
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl AppSettings {
    fn validate(&self) -> Result<()> {
        if self.request_timeout_seconds == 0 {
            return Err(BotError::Configuration(
                "request_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| BotError::Configuration(format!("{} is not a valid URL: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trading.max_position_size_percentage, dec!(0.1));
        assert_eq!(config.settings.request_timeout_seconds, 10);
        assert_eq!(
            config.trading.on_data_source_error,
            DataSourceErrorPolicy::Continue
        );
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = AppConfig::default();
        config.trading.trade_interval_seconds = 0;
        assert!(matches!(config.validate(), Err(BotError::Configuration(_))));
    }

    #[test]
    fn test_rejects_fraction_out_of_range() {
        let mut config = AppConfig::default();
        config.trading.max_position_size_percentage = dec!(0);
        assert!(config.validate().is_err());

        config.trading.max_position_size_percentage = dec!(1.5);
        assert!(config.validate().is_err());

        config.trading.max_position_size_percentage = dec!(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_bankroll() {
        let mut config = AppConfig::default();
        config.trading.bankroll = dec!(-5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_credentials() {
        let mut config = AppConfig::default();
        config.kalshi.api_key = Some("  ".to_string());
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.telegram = Some(TelegramConfig {
            bot_token: String::new(),
            chat_id: 42,
            api_url: default_telegram_api_url(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_url() {
        let mut config = AppConfig::default();
        config.kalshi.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let trading: TradingConfig =
            serde_json::from_str(r#"{"on_data_source_error": "backoff"}"#).unwrap();
        assert_eq!(trading.on_data_source_error, DataSourceErrorPolicy::Backoff);
        assert_eq!(trading.trade_interval_seconds, 60);
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let config = AppConfig {
            kalshi: KalshiConfig {
                api_key: Some("kalshi-secret".to_string()),
                ..KalshiConfig::default()
            },
            telegram: Some(TelegramConfig {
                bot_token: "123456:telegram-secret".to_string(),
                chat_id: 4242,
                api_url: default_telegram_api_url(),
            }),
            ..AppConfig::default()
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("kalshi-secret"), "leaked: {}", rendered);
        assert!(!rendered.contains("telegram-secret"), "leaked: {}", rendered);
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("4242"));
    }
}
