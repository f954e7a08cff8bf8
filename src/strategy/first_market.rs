use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::common::types::{MarketSnapshot, Side, TradeProposal};
use crate::strategy::traits::DecisionEngine;

/// Placeholder policy: buy one contract of the first listed market
///
/// The first record must carry both an id and a positive price, otherwise
/// no trade is proposed. Later records are never consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMarketStrategy;

impl FirstMarketStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl DecisionEngine for FirstMarketStrategy {
    fn name(&self) -> &str {
        "first_market"
    }

    fn decide(&mut self, snapshot: &MarketSnapshot) -> Option<TradeProposal> {
        info!("Making a placeholder trade decision");

        let market = snapshot.markets.first()?;
        let (id, price) = match (&market.id, market.current_price) {
            (Some(id), Some(price)) if !id.is_empty() && price > Decimal::ZERO => (id, price),
            _ => {
                debug!("First market lacks a usable id or price: {:?}", market);
                return None;
            }
        };

        TradeProposal::new(id.clone(), Side::Buy, 1, price).ok()
    }
}
