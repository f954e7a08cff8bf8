//! Trait definitions for the bot's external collaborators

use async_trait::async_trait;

use super::errors::Result;
use super::types::MarketSnapshot;

/// Trait for market data sources (Kalshi REST API, fixtures, etc.)
///
/// A source supplies a snapshot of tradable markets on request. It may
/// fail, or succeed with no data at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the current market snapshot
    ///
    /// Returns `Ok(None)` when the source responded but had nothing to offer.
    async fn fetch_snapshot(&self) -> Result<Option<MarketSnapshot>>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}

/// Trait for operator notification channels
///
/// Delivery is fire-and-forget relative to trading: callers log and
/// discard errors returned here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a trade confirmation message
    async fn notify_trade(&self, message: &str) -> Result<()>;

    /// Deliver an error report
    async fn notify_error(&self, message: &str) -> Result<()>;
}

/// Boxed market data source for dynamic dispatch
pub type BoxedMarketDataSource = Box<dyn MarketDataSource>;
