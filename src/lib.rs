//! KalshiBot Library
//!
//! A Rust library for running a position-sized trading loop against the
//! Kalshi prediction market, with operator notifications over Telegram.

pub mod common;
pub mod config;
pub mod kalshi;
pub mod notify;
pub mod scheduler;
pub mod strategy;
pub mod trading;

// Re-export commonly used types
pub use common::errors::{BotError, Result};
pub use common::traits::{MarketDataSource, Notifier};
pub use common::types::{MarketRecord, MarketSnapshot, Side, TradeProposal};
pub use config::types::AppConfig;
pub use kalshi::rest::KalshiRestClient;
pub use notify::{LogNotifier, SharedNotifier, TelegramNotifier};
pub use scheduler::{CycleError, Scheduler};

// Strategy and trading types
pub use strategy::{BoxedDecisionEngine, DecisionEngine, FirstMarketStrategy, StrategyChain};
pub use trading::{
    ExecutionOutcome, Fill, PositionBook, PositionSnapshot, RiskLimits, SkipReason, TradeExecutor,
};
