//! Risk-constrained trade execution
//!
//! Every proposal is capped so that its notional value never exceeds a
//! fixed fraction of the bankroll. Oversized proposals are scaled down to
//! the largest whole quantity that fits, and dropped if that is zero.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::position_book::PositionBook;
use crate::common::errors::{BotError, Result};
use crate::common::types::{Side, TradeProposal};
use crate::config::types::TradingConfig;
use crate::notify::SharedNotifier;

/// Risk parameters applied to every trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskLimits {
    /// Fraction of bankroll a single trade may be worth, in (0, 1]
    pub max_position_size_percentage: Decimal,
    /// Reserved for stop-loss exits
    pub stop_loss_percentage: Decimal,
}

impl RiskLimits {
    pub fn new(max_position_size_percentage: Decimal, stop_loss_percentage: Decimal) -> Self {
        Self {
            max_position_size_percentage,
            stop_loss_percentage,
        }
    }

    /// Largest notional value a single trade may carry
    pub fn max_trade_value(&self, bankroll: Decimal) -> Result<Decimal> {
        bankroll
            .checked_mul(self.max_position_size_percentage)
            .ok_or_else(|| {
                BotError::Execution(format!(
                    "max trade value overflow for bankroll {}",
                    bankroll
                ))
            })
    }

    /// Quantity that keeps a proposal within the max trade value
    ///
    /// Returns the requested quantity when it already fits, otherwise
    /// `floor(max_trade_value / price)`; zero means nothing fits.
    pub fn sized_quantity(&self, proposal: &TradeProposal, bankroll: Decimal) -> Result<u64> {
        let max_trade_value = self.max_trade_value(bankroll)?;
        let price = proposal.price();
        let value = Decimal::from(proposal.quantity())
            .checked_mul(price)
            .ok_or_else(|| {
                BotError::Execution(format!(
                    "trade value overflow for {}",
                    proposal.market_id()
                ))
            })?;

        if value <= max_trade_value {
            return Ok(proposal.quantity());
        }

        warn!(
            "Trade value ({}) exceeds max position size ({}). Adjusting quantity.",
            value, max_trade_value
        );

        let adjusted = max_trade_value
            .checked_div(price)
            .ok_or_else(|| {
                BotError::Execution(format!(
                    "cannot size {} at price {}",
                    proposal.market_id(),
                    price
                ))
            })?
            .floor();

        if adjusted <= Decimal::ZERO {
            return Ok(0);
        }
        adjusted.to_u64().ok_or_else(|| {
            BotError::Execution(format!("adjusted quantity {} out of range", adjusted))
        })
    }
}

impl From<&TradingConfig> for RiskLimits {
    fn from(config: &TradingConfig) -> Self {
        Self::new(
            config.max_position_size_percentage,
            config.stop_loss_percentage,
        )
    }
}

/// Why a proposal was dropped without booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Position sizing left no whole contract to trade
    AdjustedQuantityZero,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::AdjustedQuantityZero => write!(f, "adjusted quantity zero"),
        }
    }
}

/// A booked trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub market_id: String,
    pub side: Side,
    /// Quantity the proposal asked for
    pub requested_quantity: u64,
    /// Quantity actually booked after sizing
    pub quantity: u64,
    pub price: Decimal,
    /// Net position in the market after this fill
    pub position_after: i64,
    pub executed_at: DateTime<Utc>,
}

impl Fill {
    pub fn was_adjusted(&self) -> bool {
        self.quantity != self.requested_quantity
    }

    /// Operator-facing confirmation text
    pub fn message(&self) -> String {
        format!(
            "{} {} units of {} at {}.",
            self.side.past_tense(),
            self.quantity,
            self.market_id,
            self.price
        )
    }
}

/// Result of one call to [`TradeExecutor::execute`]
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// There was nothing to execute
    NoOp,
    /// The proposal was dropped before touching the book
    Skipped {
        market_id: String,
        reason: SkipReason,
    },
    /// The trade was booked
    Executed(Fill),
    /// Booking failed; the book is unchanged
    Failed { market_id: String, error: BotError },
}

impl ExecutionOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed(_))
    }

    pub fn fill(&self) -> Option<&Fill> {
        match self {
            Self::Executed(fill) => Some(fill),
            _ => None,
        }
    }
}

/// Applies risk limits to proposals, books them and notifies the operator
pub struct TradeExecutor {
    limits: RiskLimits,
    notifier: SharedNotifier,
}

impl TradeExecutor {
    pub fn new(limits: RiskLimits, notifier: SharedNotifier) -> Self {
        Self { limits, notifier }
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Execute a proposal against the book
    ///
    /// Never returns an error: failures are logged, reported to the
    /// operator and surfaced as [`ExecutionOutcome::Failed`].
    pub async fn execute(
        &self,
        proposal: Option<&TradeProposal>,
        bankroll: Decimal,
        book: &mut PositionBook,
    ) -> ExecutionOutcome {
        let Some(proposal) = proposal else {
            info!("No trade decision to execute");
            return ExecutionOutcome::NoOp;
        };

        match self.book_trade(proposal, bankroll, book) {
            Ok(Some(fill)) => {
                if let Err(e) = self.notifier.notify_trade(&fill.message()).await {
                    warn!("Failed to deliver trade notification: {}", e);
                }
                ExecutionOutcome::Executed(fill)
            }
            Ok(None) => {
                info!("Adjusted quantity is zero. Skipping trade.");
                ExecutionOutcome::Skipped {
                    market_id: proposal.market_id().to_string(),
                    reason: SkipReason::AdjustedQuantityZero,
                }
            }
            Err(error) => {
                let market_id = proposal.market_id().to_string();
                error!("Error executing trade for {}: {}", market_id, error);
                let message = format!("Trade execution error for {}: {}", market_id, error);
                if let Err(e) = self.notifier.notify_error(&message).await {
                    warn!("Failed to deliver error notification: {}", e);
                }
                ExecutionOutcome::Failed { market_id, error }
            }
        }
    }

    /// Size and book a proposal, returning `None` when sizing leaves nothing
    fn book_trade(
        &self,
        proposal: &TradeProposal,
        bankroll: Decimal,
        book: &mut PositionBook,
    ) -> Result<Option<Fill>> {
        let quantity = self.limits.sized_quantity(proposal, bankroll)?;
        if quantity == 0 {
            return Ok(None);
        }

        info!(
            "Executing {} trade for event {} at price {} for {} units.",
            proposal.side(),
            proposal.market_id(),
            proposal.price(),
            quantity
        );
        let position_after = book.apply(proposal.market_id(), proposal.side(), quantity)?;

        Ok(Some(Fill {
            market_id: proposal.market_id().to_string(),
            side: proposal.side(),
            requested_quantity: proposal.quantity(),
            quantity,
            price: proposal.price(),
            position_after,
            executed_at: Utc::now(),
        }))
    }

    /// Stop-loss extension point
    ///
    /// Would propose a closing sell when a long position's live price has
    /// fallen more than `stop_loss_percentage` below its entry price. The
    /// book tracks quantity only and there is no live price feed, so this
    /// never proposes anything yet.
    pub fn stop_loss_check(&self, market_id: &str, book: &PositionBook) -> Option<TradeProposal> {
        if book.is_long(market_id) {
            debug!(
                "Stop-loss not evaluated for {} (threshold {}): no entry price tracking",
                market_id, self.limits.stop_loss_percentage
            );
        }
        None
    }
}
