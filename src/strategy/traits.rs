use crate::common::types::{MarketSnapshot, TradeProposal};

/// Core decision trait
///
/// A decision engine looks at one market snapshot and proposes at most one
/// trade. Sizing and risk limits are applied afterwards by the
/// [`TradeExecutor`](crate::trading::TradeExecutor), so engines only express
/// intent.
///
/// # Implementation Notes
///
/// - `decide` should be fast - no blocking I/O
/// - Internal state (price history, indicators) is owned by the engine
/// - Engines never touch the position book
///
/// # Example
///
/// ```ignore
/// struct CheapestMarket;
///
/// impl DecisionEngine for CheapestMarket {
///     fn name(&self) -> &str { "cheapest_market" }
///
///     fn decide(&mut self, snapshot: &MarketSnapshot) -> Option<TradeProposal> {
///         let market = snapshot
///             .markets
///             .iter()
///             .filter(|m| m.id.is_some() && m.current_price.is_some())
///             .min_by_key(|m| m.current_price)?;
///         TradeProposal::new(market.id.clone()?, Side::Buy, 1, market.current_price?).ok()
///     }
/// }
/// ```
pub trait DecisionEngine: Send + Sync {
    /// Unique identifier for this engine
    fn name(&self) -> &str;

    /// Derive zero or one trade proposal from a snapshot
    fn decide(&mut self, snapshot: &MarketSnapshot) -> Option<TradeProposal>;
}

/// Boxed decision engine for dynamic dispatch
pub type BoxedDecisionEngine = Box<dyn DecisionEngine>;
