//! In-memory exchange
//!
//! Backs the `Exchange` port with plain shared state. Tests script
//! the snapshots the bot will observe and inspect the order book it
//! leaves behind; nothing matches or fills on its own. A stale-state
//! rejection can be armed to fire on the next amend batch.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rust_decimal_macros::dec;
use std::sync::Arc;
use talos_core::{
    AmendOrder, CreateOrder, FillRecord, Instrument, LiveOrder, LiveOrderStatus, MarginSnapshot,
    MarketState, OrderKind, OrderTag, PositionSnapshot,
};
use talos_ports::{Exchange, ExchangeError, ExchangeResult};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct CallCounters {
    open_orders: usize,
    create_batches: usize,
    amend_batches: usize,
    cancel_batches: usize,
}

struct SimState {
    instrument: Instrument,
    position: PositionSnapshot,
    margin: MarginSnapshot,
    orders: Vec<LiveOrder>,
    fills: Vec<FillRecord>,
    fail_next_amend: bool,
    counters: CallCounters,
}

/// Scriptable in-memory exchange
#[derive(Clone)]
pub struct SimExchange {
    state: Arc<Mutex<SimState>>,
}

impl SimExchange {
    pub fn new(instrument: Instrument, position: PositionSnapshot, margin: MarginSnapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                instrument,
                position,
                margin,
                orders: Vec::new(),
                fills: Vec::new(),
                fail_next_amend: false,
                counters: CallCounters::default(),
            })),
        }
    }

    /// A flat account on an open XBTUSD market, useful as a baseline.
    pub fn flat_xbtusd() -> Self {
        let instrument = Instrument {
            symbol: "XBTUSD".to_string(),
            tick_size: dec!(0.5),
            tick_log: 1,
            state: MarketState::Open,
            mark_price: dec!(10000),
            bid_price: Some(dec!(9999.5)),
            ask_price: Some(dec!(10000.5)),
            funding_rate: dec!(0.0001),
            timestamp: Utc::now(),
        };
        Self::new(
            instrument,
            PositionSnapshot::flat("XBTUSD", dec!(10)),
            MarginSnapshot {
                wallet_balance: dec!(100_000_000),
                available_margin: dec!(100_000_000),
            },
        )
    }

    pub async fn set_instrument(&self, instrument: Instrument) {
        self.state.lock().await.instrument = instrument;
    }

    pub async fn set_mark_price(&self, mark: rust_decimal::Decimal) {
        let mut state = self.state.lock().await;
        state.instrument.mark_price = mark;
        state.instrument.bid_price = Some(mark - state.instrument.tick_size);
        state.instrument.ask_price = Some(mark + state.instrument.tick_size);
    }

    pub async fn set_position(&self, position: PositionSnapshot) {
        self.state.lock().await.position = position;
    }

    pub async fn set_margin(&self, margin: MarginSnapshot) {
        self.state.lock().await.margin = margin;
    }

    /// Prepend a fill, keeping the newest-first ordering queries expect.
    pub async fn push_fill(&self, fill: FillRecord) {
        self.state.lock().await.fills.insert(0, fill);
    }

    /// Seed a resting order directly, bypassing `create_orders`.
    pub async fn seed_order(&self, order: LiveOrder) {
        self.state.lock().await.orders.push(order);
    }

    /// Arm a stale-order-state rejection for the next amend batch.
    pub async fn fail_next_amend(&self) {
        self.state.lock().await.fail_next_amend = true;
    }

    pub async fn orders(&self) -> Vec<LiveOrder> {
        self.state.lock().await.orders.clone()
    }

    pub async fn open_orders_calls(&self) -> usize {
        self.state.lock().await.counters.open_orders
    }

    pub async fn amend_batches(&self) -> usize {
        self.state.lock().await.counters.amend_batches
    }

    pub async fn cancel_batches(&self) -> usize {
        self.state.lock().await.counters.cancel_batches
    }
}

#[async_trait]
impl Exchange for SimExchange {
    async fn instrument(&self) -> ExchangeResult<Instrument> {
        Ok(self.state.lock().await.instrument.clone())
    }

    async fn position(&self) -> ExchangeResult<PositionSnapshot> {
        Ok(self.state.lock().await.position.clone())
    }

    async fn margin(&self) -> ExchangeResult<MarginSnapshot> {
        Ok(self.state.lock().await.margin.clone())
    }

    async fn open_orders(&self) -> ExchangeResult<Vec<LiveOrder>> {
        let mut state = self.state.lock().await;
        state.counters.open_orders += 1;
        Ok(state.orders.clone())
    }

    async fn recent_fills(&self, count: usize) -> ExchangeResult<Vec<FillRecord>> {
        let state = self.state.lock().await;
        Ok(state.fills.iter().take(count).cloned().collect())
    }

    async fn create_orders(&self, orders: Vec<CreateOrder>) -> ExchangeResult<()> {
        let mut state = self.state.lock().await;
        state.counters.create_batches += 1;
        for order in orders {
            debug!("sim create {} {} @ {}", order.cl_ord_id, order.qty, order.price);
            let (price, stop_price) = match order.kind {
                OrderKind::Limit => (Some(order.price), None),
                OrderKind::Stop => (None, Some(order.price)),
            };
            state.orders.push(LiveOrder {
                order_id: Uuid::new_v4().to_string(),
                tag: OrderTag::parse(&order.cl_ord_id),
                cl_ord_id: order.cl_ord_id,
                side: order.side,
                kind: order.kind,
                price,
                stop_price,
                order_qty: order.qty,
                leaves_qty: order.qty,
                cum_qty: rust_decimal::Decimal::ZERO,
                status: LiveOrderStatus::New,
            });
        }
        Ok(())
    }

    async fn amend_orders(&self, orders: Vec<AmendOrder>) -> ExchangeResult<()> {
        let mut state = self.state.lock().await;
        state.counters.amend_batches += 1;
        if state.fail_next_amend {
            state.fail_next_amend = false;
            return Err(ExchangeError::StaleOrderState);
        }
        for amend in orders {
            let Some(existing) = state.orders.iter_mut().find(|o| o.order_id == amend.order_id)
            else {
                return Err(ExchangeError::StaleOrderState);
            };
            match existing.kind {
                OrderKind::Limit => existing.price = Some(amend.price),
                OrderKind::Stop => existing.stop_price = Some(amend.price),
            }
            existing.order_qty = amend.qty;
            existing.leaves_qty = amend.qty - existing.cum_qty;
        }
        Ok(())
    }

    async fn cancel_orders(&self, order_ids: Vec<String>) -> ExchangeResult<()> {
        let mut state = self.state.lock().await;
        state.counters.cancel_batches += 1;
        for order_id in &order_ids {
            if !state.orders.iter().any(|o| &o.order_id == order_id) {
                return Err(ExchangeError::StaleOrderState);
            }
        }
        state.orders.retain(|o| !order_ids.contains(&o.order_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talos_core::Side;

    #[tokio::test]
    async fn test_create_then_amend_then_cancel() {
        let sim = SimExchange::flat_xbtusd();
        sim.create_orders(vec![CreateOrder {
            cl_ord_id: "Buy lower_A".to_string(),
            kind: OrderKind::Limit,
            side: Side::Buy,
            price: dec!(9900),
            qty: dec!(500),
            reduce_only: false,
        }])
        .await
        .unwrap();

        let live = sim.open_orders().await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].tag.as_ref().unwrap().trend, "lower_A");

        sim.amend_orders(vec![AmendOrder {
            order_id: live[0].order_id.clone(),
            kind: OrderKind::Limit,
            side: Side::Buy,
            price: dec!(9905),
            qty: dec!(400),
        }])
        .await
        .unwrap();
        let live = sim.open_orders().await.unwrap();
        assert_eq!(live[0].price, Some(dec!(9905)));
        assert_eq!(live[0].leaves_qty, dec!(400));

        sim.cancel_orders(vec![live[0].order_id.clone()]).await.unwrap();
        assert!(sim.open_orders().await.unwrap().is_empty());
        assert_eq!(sim.open_orders_calls().await, 3);
    }

    #[tokio::test]
    async fn test_stop_orders_carry_trigger_price() {
        let sim = SimExchange::flat_xbtusd();
        sim.create_orders(vec![CreateOrder {
            cl_ord_id: "SL lower_A".to_string(),
            kind: OrderKind::Stop,
            side: Side::Sell,
            price: dec!(9800),
            qty: dec!(500),
            reduce_only: true,
        }])
        .await
        .unwrap();
        let live = sim.open_orders().await.unwrap();
        assert_eq!(live[0].price, None);
        assert_eq!(live[0].stop_price, Some(dec!(9800)));
        assert_eq!(live[0].working_price(), Some(dec!(9800)));
    }

    #[tokio::test]
    async fn test_armed_amend_failure_fires_once() {
        let sim = SimExchange::flat_xbtusd();
        sim.create_orders(vec![CreateOrder {
            cl_ord_id: "Buy lower_A".to_string(),
            kind: OrderKind::Limit,
            side: Side::Buy,
            price: dec!(9900),
            qty: dec!(500),
            reduce_only: false,
        }])
        .await
        .unwrap();
        let order_id = sim.open_orders().await.unwrap()[0].order_id.clone();
        sim.fail_next_amend().await;

        let amend = AmendOrder {
            order_id,
            kind: OrderKind::Limit,
            side: Side::Buy,
            price: dec!(9910),
            qty: dec!(500),
        };
        let err = sim.amend_orders(vec![amend.clone()]).await.unwrap_err();
        assert!(err.is_stale());
        sim.amend_orders(vec![amend]).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_unknown_order_is_stale() {
        let sim = SimExchange::flat_xbtusd();
        let err = sim
            .cancel_orders(vec!["missing".to_string()])
            .await
            .unwrap_err();
        assert!(err.is_stale());
    }
}
