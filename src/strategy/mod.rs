//! Strategy module for trade decision making
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ONE CYCLE                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MarketSnapshot arrives                                     │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  DecisionEngine.decide() → Option<TradeProposal>            │
//! │       │                                                     │
//! │       ▼ (if Some)                                           │
//! │  TradeExecutor                                              │
//! │    - Caps the trade value at a fraction of the bankroll     │
//! │    - Books the fill and notifies the operator               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`DecisionEngine`]: Trait for implementing decision policies
//! - [`FirstMarketStrategy`]: Placeholder policy, buys the first market
//! - [`StrategyChain`]: Runs several engines in priority order

mod chain;
mod first_market;
mod traits;

pub use chain::StrategyChain;
pub use first_market::FirstMarketStrategy;
pub use traits::{BoxedDecisionEngine, DecisionEngine};
