use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::common::errors::{BotError, Result};
use crate::common::types::Side;

/// In-memory net position per market
///
/// Positive = net long, negative = net short, absent or zero = flat.
/// Entries are never removed once created. Only the trade executor can
/// apply fills; everyone else gets read access.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: HashMap<String, i64>,
}

/// Read-only copy of the book, ordered by market id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionSnapshot {
    pub positions: BTreeMap<String, i64>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net quantity held in a market (zero when never traded)
    pub fn position(&self, market_id: &str) -> i64 {
        self.positions.get(market_id).copied().unwrap_or_default()
    }

    /// Check if a market has ever been traded
    pub fn contains(&self, market_id: &str) -> bool {
        self.positions.contains_key(market_id)
    }

    /// Check if we hold a net long position in a market
    pub fn is_long(&self, market_id: &str) -> bool {
        self.position(market_id) > 0
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot {
            positions: self
                .positions
                .iter()
                .map(|(id, qty)| (id.clone(), *qty))
                .collect(),
        }
    }

    /// Apply a fill and return the resulting position
    ///
    /// The book is left untouched if the new position would overflow.
    pub(crate) fn apply(&mut self, market_id: &str, side: Side, quantity: u64) -> Result<i64> {
        let delta = i64::try_from(quantity).map_err(|_| {
            BotError::Execution(format!("quantity {} exceeds position range", quantity))
        })?;
        let current = self.position(market_id);
        let updated = match side {
            Side::Buy => current.checked_add(delta),
            Side::Sell => current.checked_sub(delta),
        }
        .ok_or_else(|| {
            BotError::Execution(format!(
                "position overflow on {}: {} {} {}",
                market_id, current, side, quantity
            ))
        })?;

        self.positions.insert(market_id.to_string(), updated);
        Ok(updated)
    }
}
