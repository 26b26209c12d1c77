//! Decision cycle
//!
//! One logical actor, sequential awaits. Every cycle rebuilds its view
//! of the world from exchange snapshots, decides the full desired
//! order set, and converges the live book onto it. A stale-book
//! rejection restarts the cycle from the snapshots, bounded by the
//! configured retry limit.

use crate::bootstrap::Settings;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use talos_core::{LiveOrder, OrderKind, OrderRole, TrendSet};
use talos_order_manager::{converge, executor, ExecutionReport};
use talos_ports::{
    BotEvent, Exchange, ExchangeError, ExchangeResult, Notifier, StatusReport, TrendSource,
};
use talos_risk_manager::RiskManager;
use talos_strategy::{BandTradeStrategy, BreakoutStrategy, CycleCarry, CycleContext};
use tokio::signal;
use tokio::time;

/// What a single decision cycle did
#[derive(Debug)]
pub enum CycleOutcome {
    /// Convergence ran; the report says what changed on the book
    Converged(ExecutionReport),
    /// Sanity checks failed; nothing was sent
    Skipped(String),
}

/// The trading loop
pub struct Trader {
    exchange: Arc<dyn Exchange>,
    trends: Box<dyn TrendSource>,
    notifier: Box<dyn Notifier>,
    settings: Settings,
    band: BandTradeStrategy,
    breakout: BreakoutStrategy,
    risk: RiskManager,
    carry: CycleCarry,
    started: bool,
}

impl Trader {
    pub fn new(
        exchange: Arc<dyn Exchange>,
        trends: Box<dyn TrendSource>,
        notifier: Box<dyn Notifier>,
        settings: Settings,
    ) -> Self {
        let band = BandTradeStrategy::new(settings.band_config());
        let breakout = BreakoutStrategy::new(settings.breakout_config());
        let risk = RiskManager::new(settings.risk_config(), settings.breakout_config());
        Self {
            exchange,
            trends,
            notifier,
            settings,
            band,
            breakout,
            risk,
            carry: CycleCarry::default(),
            started: false,
        }
    }

    /// Run until interrupted or a fatal exchange error.
    pub async fn run(&mut self) -> ExchangeResult<()> {
        let mut ticker = time::interval(Duration::from_secs(self.settings.loop_interval_secs));
        loop {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Interrupt received");
                    return self.shutdown().await;
                }
                _ = ticker.tick() => {
                    self.run_cycle().await?;
                }
            }
        }
    }

    /// One decision cycle, restarting on stale book state.
    pub async fn run_cycle(&mut self) -> ExchangeResult<CycleOutcome> {
        let mut attempt = 0;
        loop {
            match self.try_cycle().await {
                Err(e) if e.is_stale() => {
                    attempt += 1;
                    if attempt >= self.settings.stale_retry_limit {
                        warn!("Order book stayed stale after {attempt} attempts, giving up");
                        return Err(e);
                    }
                    warn!("Order state changed mid-flight, restarting cycle");
                    time::sleep(Duration::from_secs(1)).await;
                }
                other => return other,
            }
        }
    }

    async fn try_cycle(&mut self) -> ExchangeResult<CycleOutcome> {
        let instrument = self.exchange.instrument().await?;
        if !instrument.is_tradable() {
            return Ok(self.skip(format!(
                "instrument {} is not tradable (state {})",
                instrument.symbol,
                instrument.state.as_str()
            )));
        }
        if !instrument.has_two_sided_market() {
            return Ok(self.skip(format!("{} order book is one-sided", instrument.symbol)));
        }

        let position = self.exchange.position().await?;
        let margin = self.exchange.margin().await?;
        let lines = match self.trends.trend_lines(&self.settings.symbol) {
            Ok(lines) => lines,
            Err(e) => return Ok(self.skip(format!("trend lines unavailable: {e}"))),
        };
        let ctx = CycleContext {
            instrument,
            position,
            margin,
            trends: TrendSet::new(lines),
        };

        if !self.started {
            self.carry.starting_qty = ctx.position.current_qty;
            self.started = true;
        }
        self.carry.running_qty = ctx.position.current_qty;

        for line in ctx.trends.iter() {
            debug!("{} predicted at {}", line.name, ctx.predicted(line));
        }
        self.notifier.status(&StatusReport {
            balance_xbt: ctx.margin.wallet_balance_xbt(),
            position_qty: ctx.position.current_qty,
            delta: self.carry.contracts_traded(),
            mark_price: ctx.instrument.mark_price,
        });
        self.check_position_limits(&ctx);

        let live = self.exchange.open_orders().await?;
        let (desired, cancels) = if ctx.position.is_flat() {
            let mut batch = self.band.propose(&ctx, self.notifier.as_ref());
            for order in self.breakout.propose(&ctx, self.notifier.as_ref()).iter() {
                batch.push(order.clone());
            }
            (batch, Vec::new())
        } else {
            let fills = self
                .exchange
                .recent_fills(self.settings.fill_lookup_count)
                .await?;
            let decision =
                self.risk
                    .decide(&ctx, &self.carry, &fills, &live, self.notifier.as_ref());
            (decision.orders, decision.cancels)
        };

        let mut plan = converge::plan(&desired, &live);
        plan.cancels = cancels.into_iter().map(|o| o.order_id).collect();
        let report = executor::execute(self.exchange.as_ref(), plan, self.notifier.as_ref()).await?;

        self.carry.last_mark_price = Some(ctx.instrument.mark_price);
        Ok(CycleOutcome::Converged(report))
    }

    fn skip(&self, reason: String) -> CycleOutcome {
        warn!("{reason}");
        self.notifier.event(&BotEvent::CycleAborted {
            reason: reason.clone(),
        });
        CycleOutcome::Skipped(reason)
    }

    fn check_position_limits(&self, ctx: &CycleContext) {
        let qty = ctx.position.current_qty;
        if qty < self.settings.min_position || qty > self.settings.max_position {
            warn!(
                "Position {qty} outside limits [{}, {}]",
                self.settings.min_position, self.settings.max_position
            );
        }
    }

    /// Cancel resting orders before exit. With a position open, its
    /// protective stop and take-profit orders are left on the book.
    pub async fn shutdown(&self) -> ExchangeResult<()> {
        info!("Shutting down. All open limit orders will be cancelled.");
        let mut last_err = ExchangeError::ConnectionLost;
        for _ in 0..5 {
            match self.cancel_resting_orders().await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_auth() => {
                    info!("Was not authenticated; could not cancel orders.");
                    last_err = e;
                }
                Err(e) => {
                    info!("Unable to cancel orders: {e}");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    async fn cancel_resting_orders(&self) -> ExchangeResult<()> {
        let orders = self.exchange.open_orders().await?;
        let position = self.exchange.position().await?;
        let to_cancel: Vec<String> = if position.is_flat() {
            info!("Resetting current position. Canceling all existing orders.");
            orders.iter().map(|o| o.order_id.clone()).collect()
        } else {
            info!("Resetting current position. Leaving only SL and TP orders.");
            orders
                .iter()
                .filter(|o| cancel_with_open_position(o))
                .map(|o| o.order_id.clone())
                .collect()
        };
        if !to_cancel.is_empty() {
            self.exchange.cancel_orders(to_cancel).await?;
        }
        Ok(())
    }
}

/// Whether an order is safe to cancel while a position is open:
/// breakout triggers and plain entry limits go, stops and take-profits
/// stay.
fn cancel_with_open_position(order: &LiveOrder) -> bool {
    match &order.tag {
        Some(tag) if matches!(tag.role, OrderRole::BreakoutEntry(_)) => true,
        Some(tag) => order.kind != OrderKind::Stop && tag.role != OrderRole::TakeProfit,
        None => order.kind != OrderKind::Stop,
    }
}
