//! Order types
//!
//! `DesiredOrder` is rebuilt from scratch every decision cycle and
//! never persisted; `LiveOrder` mirrors what actually rests on the
//! exchange and is authoritative over anything remembered locally.

use crate::tag::OrderTag;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// +1 for long entries, -1 for short entries
    pub fn sign(&self) -> Decimal {
        match self {
            Self::Buy => Decimal::ONE,
            Self::Sell => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Order type: passive limit or trigger stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Limit,
    Stop,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "Limit",
            Self::Stop => "Stop",
        }
    }
}

/// An order the current cycle wants resting on the exchange.
///
/// `price` is the limit price for Limit orders and the trigger price
/// for Stop orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredOrder {
    pub kind: OrderKind,
    pub side: Side,
    pub price: Decimal,
    pub qty: Decimal,
    pub reduce_only: bool,
    pub tag: OrderTag,
}

impl DesiredOrder {
    pub fn limit(side: Side, price: Decimal, qty: Decimal, tag: OrderTag) -> Self {
        Self {
            kind: OrderKind::Limit,
            side,
            price,
            qty,
            reduce_only: false,
            tag,
        }
    }

    pub fn stop(side: Side, trigger: Decimal, qty: Decimal, tag: OrderTag) -> Self {
        Self {
            kind: OrderKind::Stop,
            side,
            price: trigger,
            qty,
            reduce_only: false,
            tag,
        }
    }

    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = true;
        self
    }
}

/// Status of an exchange-resident order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiveOrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
}

/// An order as reported by the exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveOrder {
    /// Exchange-assigned order ID
    pub order_id: String,
    /// Raw client-order-ID string
    pub cl_ord_id: String,
    /// Parsed identity; None for untagged/foreign orders
    pub tag: Option<OrderTag>,
    pub side: Side,
    pub kind: OrderKind,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub order_qty: Decimal,
    pub leaves_qty: Decimal,
    pub cum_qty: Decimal,
    pub status: LiveOrderStatus,
}

impl LiveOrder {
    /// The price convergence compares against: trigger for stops,
    /// limit price otherwise.
    pub fn working_price(&self) -> Option<Decimal> {
        match self.kind {
            OrderKind::Stop => self.stop_price,
            OrderKind::Limit => self.price,
        }
    }
}

/// Fill history record used to recover a position's originating strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillRecord {
    pub symbol: String,
    pub cl_ord_id: String,
    pub side: Side,
    pub order_qty: Decimal,
    pub price: Decimal,
    /// Exchange-supplied annotation; funding settlements carry "Funding"
    pub text: String,
}

impl FillRecord {
    pub fn tag(&self) -> Option<OrderTag> {
        OrderTag::parse(&self.cl_ord_id)
    }
}

/// Desired orders for one cycle, buys and sells kept apart
#[derive(Debug, Clone, Default)]
pub struct OrderBatch {
    pub buys: Vec<DesiredOrder>,
    pub sells: Vec<DesiredOrder>,
}

impl OrderBatch {
    pub fn push(&mut self, order: DesiredOrder) {
        match order.side {
            Side::Buy => self.buys.push(order),
            Side::Sell => self.sells.push(order),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buys.len() + self.sells.len()
    }

    /// Buys first, then sells: the order the batches are submitted in.
    pub fn iter(&self) -> impl Iterator<Item = &DesiredOrder> {
        self.buys.iter().chain(self.sells.iter())
    }
}

/// Create-order command sent to the exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub cl_ord_id: String,
    pub kind: OrderKind,
    pub side: Side,
    pub price: Decimal,
    pub qty: Decimal,
    pub reduce_only: bool,
}

impl CreateOrder {
    pub fn from_desired(order: &DesiredOrder) -> Self {
        Self {
            cl_ord_id: order.tag.encode(),
            kind: order.kind,
            side: order.side,
            price: order.price,
            qty: order.qty,
            reduce_only: order.reduce_only,
        }
    }
}

/// Amend command, addressed by the exchange-assigned order ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmendOrder {
    pub order_id: String,
    pub kind: OrderKind,
    pub side: Side,
    pub price: Decimal,
    pub qty: Decimal,
}
