//! Position bookkeeping and risk-constrained execution

pub mod executor;
pub mod position_book;

pub use executor::{ExecutionOutcome, Fill, RiskLimits, SkipReason, TradeExecutor};
pub use position_book::{PositionBook, PositionSnapshot};
