//! Core market and trade types shared across the bot

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::errors::{BotError, Result};

/// Trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Past-tense verb used in operator messages
    pub fn past_tense(&self) -> &'static str {
        match self {
            Side::Buy => "Bought",
            Side::Sell => "Sold",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Side {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(BotError::InvalidSide(s.to_string())),
        }
    }
}

/// A single tradable market as reported by the market API
///
/// Every field is optional because the API may omit any of them; the
/// decision engine decides what is usable. A field of the wrong shape reads
/// as absent instead of failing the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    /// Current contract price, conventionally a probability in [0, 1]
    #[serde(default, deserialize_with = "lenient_price")]
    pub current_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
}

impl MarketRecord {
    pub fn new(id: impl Into<String>, current_price: Decimal) -> Self {
        Self {
            id: Some(id.into()),
            current_price: Some(current_price),
            title: None,
        }
    }
}

/// Point-in-time read of available markets and prices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default, deserialize_with = "lenient_records")]
    pub markets: Vec<MarketRecord>,
}

impl MarketSnapshot {
    pub fn new(markets: Vec<MarketRecord>) -> Self {
        Self { markets }
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

/// Strings pass through and numbers are rendered as text
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Numeric or quoted decimal; anything unparseable is `None`
fn lenient_price<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let parse = |s: &str| {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .ok()
    };

    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => parse(&n.to_string()),
        Value::String(s) => parse(s.trim()),
        _ => None,
    })
}

/// Records that are not objects keep their slot as an empty record
fn lenient_records<'de, D>(deserializer: D) -> std::result::Result<Vec<MarketRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|value| MarketRecord::deserialize(value).unwrap_or_default())
        .collect())
}

/// A candidate trade awaiting risk-adjusted execution
///
/// Immutable once created; all fields are validated by [`TradeProposal::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeProposal {
    market_id: String,
    side: Side,
    quantity: u64,
    price: Decimal,
}

impl TradeProposal {
    pub fn new(
        market_id: impl Into<String>,
        side: Side,
        quantity: u64,
        price: Decimal,
    ) -> Result<Self> {
        let market_id = market_id.into();
        if market_id.trim().is_empty() {
            return Err(BotError::InvalidProposal("market id is empty".to_string()));
        }
        if quantity == 0 {
            return Err(BotError::InvalidProposal(format!(
                "quantity must be positive for {}",
                market_id
            )));
        }
        if price <= Decimal::ZERO {
            return Err(BotError::InvalidProposal(format!(
                "price must be positive for {}, got {}",
                market_id, price
            )));
        }

        Ok(Self {
            market_id,
            side,
            quantity,
            price,
        })
    }

    pub fn market_id(&self) -> &str {
        &self.market_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Notional value of the proposal (quantity * price)
    pub fn value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}
