//! Configuration loader

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::types::{
    default_telegram_api_url, AppConfig, KalshiConfig, TelegramConfig, TradingConfig,
};
use crate::common::errors::{BotError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| BotError::Configuration(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| BotError::Configuration(e.to_string()))?;

    app_config.validate()?;
    Ok(app_config)
}

/// Load configuration from the bot's flat environment variables only
///
/// Recognised: `KALSHI_API_KEY`, `KALSHI_API_BASE_URL`, `TELEGRAM_BOT_TOKEN`,
/// `TELEGRAM_CHAT_ID`, `BANKROLL`, `TRADE_INTERVAL_SECONDS`,
/// `MAX_POSITION_SIZE_PERCENTAGE`, `STOP_LOSS_PERCENTAGE`.
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from any key lookup, so the parsing rules can be
/// exercised without touching the process environment.
pub(crate) fn from_lookup<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = TradingConfig::default();

    let kalshi = KalshiConfig {
        api_key: lookup("KALSHI_API_KEY"),
        base_url: lookup("KALSHI_API_BASE_URL").unwrap_or_else(|| KalshiConfig::default().base_url),
    };

    let telegram = match (lookup("TELEGRAM_BOT_TOKEN"), lookup("TELEGRAM_CHAT_ID")) {
        (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
            bot_token,
            chat_id: chat_id.trim().parse().map_err(|_| {
                BotError::Configuration(
                    "Invalid chat ID provided. It must be an integer.".to_string(),
                )
            })?,
            api_url: default_telegram_api_url(),
        }),
        (None, None) => None,
        _ => {
            return Err(BotError::Configuration(
                "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set together".to_string(),
            ))
        }
    };

    let trading = TradingConfig {
        bankroll: parse_var(&lookup, "BANKROLL")?.unwrap_or(defaults.bankroll),
        trade_interval_seconds: parse_var(&lookup, "TRADE_INTERVAL_SECONDS")?
            .unwrap_or(defaults.trade_interval_seconds),
        max_position_size_percentage: parse_var::<Decimal, _>(
            &lookup,
            "MAX_POSITION_SIZE_PERCENTAGE",
        )?
        .unwrap_or(defaults.max_position_size_percentage),
        stop_loss_percentage: parse_var::<Decimal, _>(&lookup, "STOP_LOSS_PERCENTAGE")?
            .unwrap_or(defaults.stop_loss_percentage),
        ..defaults
    };

    let config = AppConfig {
        kalshi,
        telegram,
        trading,
        settings: Default::default(),
    };
    config.validate()?;
    Ok(config)
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| BotError::Configuration(format!("{} is invalid: {}", key, e))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = from_lookup(lookup_from(&[])).unwrap();
        assert!(config.telegram.is_none());
        assert!(config.kalshi.api_key.is_none());
        assert_eq!(config.trading.bankroll, dec!(1000));
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = from_lookup(lookup_from(&[
            ("KALSHI_API_KEY", "test_key"),
            ("KALSHI_API_BASE_URL", "https://test-api.kalshi.com/trade-api/v2"),
            ("TELEGRAM_BOT_TOKEN", "test_token"),
            ("TELEGRAM_CHAT_ID", "12345"),
            ("BANKROLL", "2500.50"),
            ("TRADE_INTERVAL_SECONDS", "5"),
            ("MAX_POSITION_SIZE_PERCENTAGE", "0.2"),
            ("STOP_LOSS_PERCENTAGE", "0.1"),
        ]))
        .unwrap();

        assert_eq!(config.kalshi.api_key.as_deref(), Some("test_key"));
        assert_eq!(
            config.kalshi.base_url,
            "https://test-api.kalshi.com/trade-api/v2"
        );
        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.bot_token, "test_token");
        assert_eq!(telegram.chat_id, 12345);
        assert_eq!(config.trading.bankroll, dec!(2500.50));
        assert_eq!(config.trading.trade_interval_seconds, 5);
        assert_eq!(config.trading.max_position_size_percentage, dec!(0.2));
        assert_eq!(config.trading.stop_loss_percentage, dec!(0.1));
    }

    #[test]
    fn test_from_lookup_rejects_non_integer_chat_id() {
        let result = from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "test_token"),
            ("TELEGRAM_CHAT_ID", "test_chat_id"),
        ]));
        assert!(matches!(result, Err(BotError::Configuration(_))));
    }

    #[test]
    fn test_from_lookup_rejects_half_telegram_config() {
        let result = from_lookup(lookup_from(&[("TELEGRAM_BOT_TOKEN", "test_token")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_lookup_rejects_zero_interval() {
        let result = from_lookup(lookup_from(&[("TRADE_INTERVAL_SECONDS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_lookup_rejects_garbage_number() {
        let result = from_lookup(lookup_from(&[("BANKROLL", "lots")]));
        assert!(matches!(result, Err(BotError::Configuration(msg)) if msg.contains("BANKROLL")));
    }

    #[test]
    fn test_load_config_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("kalshi_bot_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bot.toml");
        std::fs::write(
            &path,
            r#"
[kalshi]
base_url = "https://demo-api.kalshi.co/trade-api/v2"

[trading]
bankroll = 500
trade_interval_seconds = 30
max_position_size_percentage = 0.25
on_data_source_error = "stop"
"#,
        )
        .unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.kalshi.base_url, "https://demo-api.kalshi.co/trade-api/v2");
        assert_eq!(config.trading.bankroll, dec!(500));
        assert_eq!(config.trading.trade_interval_seconds, 30);
        assert_eq!(config.trading.max_position_size_percentage, dec!(0.25));
        assert_eq!(
            config.trading.on_data_source_error,
            crate::config::types::DataSourceErrorPolicy::Stop
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
