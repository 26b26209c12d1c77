//! Risk manager entry point
//!
//! With a position open, each cycle re-derives the exit orders the
//! book should hold from the position snapshot and the fill that
//! opened it, and lists the stale entry orders to cancel.

use crate::{origin, prune, symmetric, tranche};
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use talos_core::{FillRecord, LiveOrder, OrderBatch};
use talos_ports::Notifier;
use talos_strategy::{BreakoutConfig, BreakoutStrategy, CycleCarry, CycleContext};

/// Risk management parameters
#[derive(Debug, Clone)]
pub struct RiskConfig {
    /// Distance of the trailing stop from the book top (fraction)
    pub trail_pct: Decimal,
    /// ROE fraction risked by fixed stops
    pub roe_sl: Decimal,
    /// Band width used when projecting paired-line exits (fraction)
    pub band_pct: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            trail_pct: dec!(0.003),
            roe_sl: dec!(0.20),
            band_pct: dec!(0.02),
        }
    }
}

/// Orders the book should converge to, plus live orders to cancel
#[derive(Debug, Default)]
pub struct RiskDecision {
    pub orders: OrderBatch,
    pub cancels: Vec<LiveOrder>,
}

pub struct RiskManager {
    config: RiskConfig,
    breakout: BreakoutStrategy,
}

impl RiskManager {
    pub fn new(config: RiskConfig, breakout: BreakoutConfig) -> Self {
        Self {
            config,
            breakout: BreakoutStrategy::new(breakout),
        }
    }

    /// Derive the exit order set for the open position.
    pub fn decide(
        &self,
        ctx: &CycleContext,
        carry: &CycleCarry,
        fills: &[FillRecord],
        live_orders: &[LiveOrder],
        notifier: &dyn Notifier,
    ) -> RiskDecision {
        let cancels = prune::stale_entry_orders(live_orders);
        let (fill_origin, last_fill) = origin::recover(&ctx.instrument.symbol, fills);
        info!(
            "Managing {} position of {} from {:?}",
            ctx.instrument.symbol, ctx.position.current_qty, fill_origin
        );

        let orders = match &fill_origin {
            origin::FillOrigin::Band { trend } => {
                // The fill is present whenever the origin is tagged.
                let Some(fill) = last_fill else {
                    return RiskDecision { orders: OrderBatch::default(), cancels };
                };
                let mut batch = symmetric::generate(&self.config, ctx, fill, trend);
                // Keep breakout triggers resting while the band trade
                // plays out.
                for order in self.breakout.propose(ctx, notifier).iter() {
                    batch.push(order.clone());
                }
                batch
            }
            origin::FillOrigin::Breakout { .. } | origin::FillOrigin::Unknown => {
                tranche::generate(&self.config, ctx, carry, last_fill, fills)
            }
        };
        RiskDecision { orders, cancels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use talos_core::{
        Instrument, MarginSnapshot, MarketState, OrderKind, PositionSnapshot, Side, TrendKind,
        TrendLine, TrendSet,
    };
    use talos_ports::notifier::NullNotifier;

    fn band_line(name: &str, price: Decimal) -> TrendLine {
        TrendLine {
            name: name.to_string(),
            kind: TrendKind::Band,
            time_low: Utc.timestamp_opt(1_000_000, 0).unwrap(),
            price_low: price,
            time_high: Utc.timestamp_opt(1_100_000, 0).unwrap(),
            price_high: price,
        }
    }

    fn context(qty: Decimal, lines: Vec<TrendLine>) -> CycleContext {
        CycleContext {
            instrument: Instrument {
                symbol: "XBTUSD".to_string(),
                tick_size: dec!(0.5),
                tick_log: 1,
                state: MarketState::Open,
                mark_price: dec!(100),
                bid_price: Some(dec!(99.5)),
                ask_price: Some(dec!(100.5)),
                funding_rate: dec!(0.0001),
                timestamp: Utc.timestamp_opt(1_050_000, 0).unwrap(),
            },
            position: PositionSnapshot {
                symbol: "XBTUSD".to_string(),
                current_qty: qty,
                avg_entry_price: dec!(100),
                leverage: dec!(10),
                pos_margin: dec!(1_000_000),
                maint_margin: dec!(100_000),
                liquidation_price: dec!(92),
                unrealised_pnl: Decimal::ZERO,
                realised_pnl: Decimal::ZERO,
            },
            margin: MarginSnapshot {
                wallet_balance: dec!(100_000_000),
                available_margin: dec!(100_000_000),
            },
            trends: TrendSet::new(lines),
        }
    }

    fn fill(cl_ord_id: &str, side: Side) -> FillRecord {
        FillRecord {
            symbol: "XBTUSD".to_string(),
            cl_ord_id: cl_ord_id.to_string(),
            side,
            order_qty: dec!(1000),
            price: dec!(100),
            text: String::new(),
        }
    }

    fn live(cl_ord_id: &str) -> LiveOrder {
        LiveOrder {
            order_id: format!("id-{cl_ord_id}"),
            cl_ord_id: cl_ord_id.to_string(),
            tag: talos_core::OrderTag::parse(cl_ord_id),
            side: Side::Buy,
            kind: OrderKind::Limit,
            price: Some(dec!(100)),
            stop_price: None,
            order_qty: dec!(1000),
            leaves_qty: dec!(1000),
            cum_qty: dec!(0),
            status: talos_core::LiveOrderStatus::New,
        }
    }

    #[test]
    fn test_band_origin_uses_symmetric_exits_and_keeps_breakouts() {
        let manager = RiskManager::new(RiskConfig::default(), BreakoutConfig::default());
        let mut lines = vec![band_line("lower_A", dec!(100)), band_line("higher_A", dec!(110))];
        let mut breakout = band_line("resistance_B", dec!(105));
        breakout.kind = TrendKind::Breakout;
        lines.push(breakout);
        let ctx = context(dec!(1000), lines);
        let decision = manager.decide(
            &ctx,
            &CycleCarry::default(),
            &[fill("Buy lower_A", Side::Buy)],
            &[live("Sell higher_A")],
            &NullNotifier,
        );
        let tags: Vec<String> = decision
            .orders
            .iter()
            .map(|o| o.tag.encode())
            .collect();
        assert!(tags.iter().any(|t| t.starts_with("Tp")));
        assert!(tags.contains(&"SL lower_A".to_string()));
        // The resistance trigger keeps resting alongside the exits.
        assert!(tags.contains(&"SBuy resistance_B".to_string()));
        assert_eq!(decision.cancels.len(), 1);
        assert_eq!(decision.cancels[0].cl_ord_id, "Sell higher_A");
    }

    #[test]
    fn test_breakout_origin_uses_tranche_exits() {
        let manager = RiskManager::new(RiskConfig::default(), BreakoutConfig::default());
        let ctx = context(dec!(1000), Vec::new());
        let decision = manager.decide(
            &ctx,
            &CycleCarry::default(),
            &[fill("SBuy resistance_B", Side::Buy)],
            &[],
            &NullNotifier,
        );
        let tags: Vec<String> = decision.orders.iter().map(|o| o.tag.encode()).collect();
        assert!(tags.contains(&"Tp qrt resistance_B".to_string()));
        assert!(tags.contains(&"Tp hl resistance_B".to_string()));
        assert!(tags.contains(&"Tp q3rt resistance_B".to_string()));
        assert!(tags.contains(&"SL resistance_B".to_string()));
    }

    #[test]
    fn test_unknown_origin_falls_back_to_tranche_exits() {
        let manager = RiskManager::new(RiskConfig::default(), BreakoutConfig::default());
        let ctx = context(dec!(1000), Vec::new());
        let decision = manager.decide(
            &ctx,
            &CycleCarry::default(),
            &[],
            &[],
            &NullNotifier,
        );
        let tags: Vec<String> = decision.orders.iter().map(|o| o.tag.encode()).collect();
        // Untagged positions get labelled with the placeholder name.
        assert!(tags.contains(&"Tp qrt None".to_string()));
        assert!(tags.contains(&"SL None".to_string()));
    }
}
