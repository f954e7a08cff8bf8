//! Trading loop: fetch → decide → execute → sleep

use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::common::errors::BotError;
use crate::common::traits::BoxedMarketDataSource;
use crate::config::types::{DataSourceErrorPolicy, TradingConfig};
use crate::notify::SharedNotifier;
use crate::strategy::BoxedDecisionEngine;
use crate::trading::{ExecutionOutcome, PositionBook, RiskLimits, TradeExecutor};

/// Errors that end a single trading cycle
#[derive(Error, Debug)]
pub enum CycleError {
    /// The market snapshot could not be fetched
    #[error("Market data fetch failed: {0}")]
    DataSource(#[source] BotError),
}

/// Drives one decision/execution cycle per interval
///
/// Owns the position book for the lifetime of the process; nothing else
/// holds a mutable handle to it.
pub struct Scheduler {
    source: BoxedMarketDataSource,
    engine: BoxedDecisionEngine,
    executor: TradeExecutor,
    notifier: SharedNotifier,
    book: PositionBook,
    bankroll: Decimal,
    policy: DataSourceErrorPolicy,
    max_backoff: Duration,
    consecutive_failures: u32,
}

impl Scheduler {
    pub fn new(
        source: BoxedMarketDataSource,
        engine: BoxedDecisionEngine,
        notifier: SharedNotifier,
        config: &TradingConfig,
    ) -> Self {
        Self {
            source,
            engine,
            executor: TradeExecutor::new(RiskLimits::from(config), notifier.clone()),
            notifier,
            book: PositionBook::new(),
            bankroll: config.bankroll,
            policy: config.on_data_source_error,
            max_backoff: Duration::from_secs(config.max_backoff_seconds),
            consecutive_failures: 0,
        }
    }

    pub fn book(&self) -> &PositionBook {
        &self.book
    }

    pub fn bankroll(&self) -> Decimal {
        self.bankroll
    }

    /// Run a single fetch → decide → execute cycle
    #[instrument(skip(self), fields(source = self.source.source_name(), engine = self.engine.name()))]
    pub async fn run_cycle(&mut self) -> Result<ExecutionOutcome, CycleError> {
        let snapshot = self
            .source
            .fetch_snapshot()
            .await
            .map_err(CycleError::DataSource)?;

        let proposal = match snapshot {
            Some(snapshot) => self.engine.decide(&snapshot),
            None => {
                info!("No market data fetched");
                None
            }
        };
        if proposal.is_none() {
            info!("No profitable trade opportunity found");
        }

        let outcome = self
            .executor
            .execute(proposal.as_ref(), self.bankroll, &mut self.book)
            .await;

        if let Some(fill) = outcome.fill() {
            if let Some(exit) = self.executor.stop_loss_check(&fill.market_id, &self.book) {
                warn!("Stop-loss exit proposed for {}", exit.market_id());
                self.executor
                    .execute(Some(&exit), self.bankroll, &mut self.book)
                    .await;
            }
        }

        Ok(outcome)
    }

    /// Run cycles until the error policy says stop
    ///
    /// Only returns when a cycle fails under [`DataSourceErrorPolicy::Stop`].
    pub async fn run_forever(&mut self, interval: Duration) -> Result<(), CycleError> {
        info!(
            "Starting trading loop: interval {:?}, bankroll {}, policy {:?}",
            interval, self.bankroll, self.policy
        );

        loop {
            info!("Running trading strategy");
            let delay = match self.run_cycle().await {
                Ok(_) => {
                    self.consecutive_failures = 0;
                    interval
                }
                Err(err) => {
                    self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                    error!("An error occurred: {}", err);
                    if let Err(e) = self.notifier.notify_error(&err.to_string()).await {
                        warn!("Failed to deliver error notification: {}", e);
                    }

                    match self.policy {
                        DataSourceErrorPolicy::Stop => return Err(err),
                        DataSourceErrorPolicy::Continue => interval,
                        DataSourceErrorPolicy::Backoff => {
                            backoff_delay(interval, self.consecutive_failures, self.max_backoff)
                        }
                    }
                }
            };

            tokio::time::sleep(delay).await;
        }
    }
}

/// Delay after the n-th consecutive failure: `interval * 2^(n-1)`, capped
pub fn backoff_delay(interval: Duration, failures: u32, max: Duration) -> Duration {
    let factor = 2u32.saturating_pow(failures.saturating_sub(1));
    interval.checked_mul(factor).unwrap_or(max).min(max)
}
