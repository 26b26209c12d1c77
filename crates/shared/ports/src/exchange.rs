//! Exchange collaborator port
//!
//! The transport client (REST signing, WebSocket subscriptions, rate
//! limiting) lives behind this trait. Queries return the collaborator's
//! latest snapshot; commands are synchronous from the loop's point of
//! view; each blocks the cycle until the exchange responds.

use crate::error::ExchangeResult;
use async_trait::async_trait;
use talos_core::{
    AmendOrder, CreateOrder, FillRecord, Instrument, LiveOrder, MarginSnapshot, PositionSnapshot,
};

#[async_trait]
pub trait Exchange: Send + Sync {
    /// Instrument snapshot for the traded symbol.
    async fn instrument(&self) -> ExchangeResult<Instrument>;

    /// Position snapshot for the traded symbol.
    async fn position(&self) -> ExchangeResult<PositionSnapshot>;

    /// Account margin snapshot.
    async fn margin(&self) -> ExchangeResult<MarginSnapshot>;

    /// Orders currently resting on the exchange for the symbol.
    async fn open_orders(&self) -> ExchangeResult<Vec<LiveOrder>>;

    /// Most recent filled orders for the symbol, newest first.
    async fn recent_fills(&self, count: usize) -> ExchangeResult<Vec<FillRecord>>;

    /// Create a batch of orders.
    async fn create_orders(&self, orders: Vec<CreateOrder>) -> ExchangeResult<()>;

    /// Amend a batch of orders by exchange order ID.
    async fn amend_orders(&self, orders: Vec<AmendOrder>) -> ExchangeResult<()>;

    /// Cancel a batch of orders by exchange order ID.
    async fn cancel_orders(&self, order_ids: Vec<String>) -> ExchangeResult<()>;
}
