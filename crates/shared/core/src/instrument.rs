//! Instrument snapshot as reported by the exchange

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trading state of an instrument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketState {
    Open,
    Closed,
    Other(String),
}

impl MarketState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Other(s) => s,
        }
    }
}

/// Per-cycle instrument snapshot. Read-only to the decision logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub tick_size: Decimal,
    /// Decimal places of the tick size, for log formatting
    pub tick_log: u32,
    pub state: MarketState,
    pub mark_price: Decimal,
    /// Best bid; None when that side of the book is empty
    pub bid_price: Option<Decimal>,
    /// Best ask; None when that side of the book is empty
    pub ask_price: Option<Decimal>,
    pub funding_rate: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Instrument {
    /// Instruments in any state other than Open/Closed are not quotable.
    pub fn is_tradable(&self) -> bool {
        matches!(self.state, MarketState::Open | MarketState::Closed)
    }

    /// True when both sides of the book are present.
    pub fn has_two_sided_market(&self) -> bool {
        self.bid_price.is_some() && self.ask_price.is_some()
    }

    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.bid_price, self.ask_price) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }
}
