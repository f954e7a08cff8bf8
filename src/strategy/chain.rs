use tracing::debug;

use crate::common::types::{MarketSnapshot, TradeProposal};
use crate::strategy::traits::{BoxedDecisionEngine, DecisionEngine};

/// Consults several engines in priority order and takes the first proposal
///
/// Every engine is asked, in order, until one proposes a trade; engines
/// after that are not called for the current snapshot.
#[derive(Default)]
pub struct StrategyChain {
    engines: Vec<BoxedDecisionEngine>,
}

impl StrategyChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: BoxedDecisionEngine) -> Self {
        self.engines.push(engine);
        self
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl DecisionEngine for StrategyChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn decide(&mut self, snapshot: &MarketSnapshot) -> Option<TradeProposal> {
        for engine in self.engines.iter_mut() {
            if let Some(proposal) = engine.decide(snapshot) {
                debug!("Engine {} proposed a trade on {}", engine.name(), proposal.market_id());
                return Some(proposal);
            }
        }
        None
    }
}
