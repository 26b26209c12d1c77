//! Breakout entry generator
//!
//! For each breakout-typed trend line, rest a stop order just beyond
//! the level: a broken support is sold, a broken resistance is bought.
//! Triggers that the market has already run through are skipped.

use crate::context::CycleContext;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use talos_core::{round_to_tick, DesiredOrder, OrderBatch, OrderTag, Side, TrendKind, TrendLine};
use talos_ports::{BotEvent, Notifier};

/// Configuration for the breakout generator
#[derive(Debug, Clone)]
pub struct BreakoutConfig {
    /// Trigger offset beyond the predicted level (fraction)
    pub band_pct: Decimal,
    /// Order size as a fraction of account margin
    pub order_size_fraction: Decimal,
    /// Leverage used for sizing
    pub leverage: Decimal,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            band_pct: dec!(0.01),
            order_size_fraction: dec!(0.01),
            leverage: dec!(10),
        }
    }
}

/// Enter when price breaks a support or resistance level.
pub struct BreakoutStrategy {
    config: BreakoutConfig,
}

impl BreakoutStrategy {
    pub fn new(config: BreakoutConfig) -> Self {
        Self { config }
    }

    /// Propose trigger entries for every breakout-typed trend line.
    pub fn propose(&self, ctx: &CycleContext, notifier: &dyn Notifier) -> OrderBatch {
        let mut batch = OrderBatch::default();
        for line in ctx.trends.iter() {
            if line.kind != TrendKind::Breakout {
                continue;
            }
            if let Some(order) = self.propose_line(ctx, line, notifier) {
                batch.push(order);
            }
        }
        batch
    }

    fn propose_line(
        &self,
        ctx: &CycleContext,
        line: &TrendLine,
        notifier: &dyn Notifier,
    ) -> Option<DesiredOrder> {
        let side = line.breakout_side()?;
        // Resistance breaks upward, support downward.
        let trend_sign = side.sign();
        let trigger = round_to_tick(
            ctx.predicted(line) * (Decimal::ONE + trend_sign * self.config.band_pct),
            ctx.instrument.tick_size,
        );
        let bid = ctx.instrument.bid_price?;
        let ask = ctx.instrument.ask_price?;

        let crossed = match side {
            Side::Sell => trigger > dec!(1.03) * bid,
            Side::Buy => trigger < dec!(0.97) * ask,
        };
        if crossed {
            let reason = format!(
                "{} trigger at {trigger} already crossed (bid {bid} / ask {ask})",
                side.as_str()
            );
            info!("Breakout: {}: {reason}", line.name);
            notifier.event(&BotEvent::SignalSkipped {
                trend: line.name.clone(),
                reason,
            });
            return None;
        }

        let size = (trigger
            * ctx.account_margin_xbt()
            * self.config.order_size_fraction
            * self.config.leverage)
            .trunc();
        if size <= Decimal::ZERO {
            debug!("Breakout: {} sized to zero contracts, skipping", line.name);
            return None;
        }

        info!(
            "Breakout: {} {} {size} @ trigger {trigger}",
            side.as_str(),
            line.name
        );
        Some(DesiredOrder::stop(
            side,
            trigger,
            size,
            OrderTag::breakout_entry(side, &line.name),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use talos_core::{
        Instrument, MarginSnapshot, MarketState, OrderKind, PositionSnapshot, TrendSet,
    };
    use talos_ports::notifier::NullNotifier;

    fn flat_line(name: &str, price: Decimal) -> TrendLine {
        TrendLine {
            name: name.to_string(),
            kind: TrendKind::Breakout,
            time_low: Utc.timestamp_opt(1_000_000, 0).unwrap(),
            price_low: price,
            time_high: Utc.timestamp_opt(1_100_000, 0).unwrap(),
            price_high: price,
        }
    }

    fn context(lines: Vec<TrendLine>, bid: Decimal, ask: Decimal) -> CycleContext {
        CycleContext {
            instrument: Instrument {
                symbol: "XBTUSD".to_string(),
                tick_size: dec!(0.5),
                tick_log: 1,
                state: MarketState::Open,
                mark_price: (bid + ask) / dec!(2),
                bid_price: Some(bid),
                ask_price: Some(ask),
                funding_rate: dec!(0.0001),
                timestamp: Utc.timestamp_opt(1_050_000, 0).unwrap(),
            },
            position: PositionSnapshot::flat("XBTUSD", dec!(10)),
            margin: MarginSnapshot {
                wallet_balance: dec!(100_000_000),
                available_margin: dec!(100_000_000),
            },
            trends: TrendSet::new(lines),
        }
    }

    #[test]
    fn test_resistance_break_is_buy_stop() {
        let ctx = context(vec![flat_line("resistance_B", dec!(100))], dec!(99), dec!(100));
        let batch = BreakoutStrategy::new(BreakoutConfig::default()).propose(&ctx, &NullNotifier);
        assert_eq!(batch.buys.len(), 1);
        let order = &batch.buys[0];
        assert_eq!(order.kind, OrderKind::Stop);
        assert_eq!(order.price, dec!(101)); // 100 * 1.01
        assert_eq!(order.tag.encode(), "SBuy resistance_B");
        assert!(!order.reduce_only);
    }

    #[test]
    fn test_support_break_is_sell_stop() {
        let ctx = context(vec![flat_line("support_B", dec!(100))], dec!(100), dec!(101));
        let batch = BreakoutStrategy::new(BreakoutConfig::default()).propose(&ctx, &NullNotifier);
        assert_eq!(batch.sells.len(), 1);
        assert_eq!(batch.sells[0].price, dec!(99)); // 100 * 0.99
        assert_eq!(batch.sells[0].tag.encode(), "SSell support_B");
    }

    #[test]
    fn test_crossed_trigger_skips() {
        // Sell trigger at 99 while the bid has collapsed to 90.
        let ctx = context(vec![flat_line("support_B", dec!(100))], dec!(90), dec!(91));
        let batch = BreakoutStrategy::new(BreakoutConfig::default()).propose(&ctx, &NullNotifier);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_band_lines_are_ignored() {
        let mut line = flat_line("support_B", dec!(100));
        line.kind = TrendKind::Band;
        let ctx = context(vec![line], dec!(100), dec!(101));
        let batch = BreakoutStrategy::new(BreakoutConfig::default()).propose(&ctx, &NullNotifier);
        assert!(batch.is_empty());
    }
}
