//! Band-trade entry generator
//!
//! For each band-typed trend line, quote a passive limit entry just
//! inside the level and pre-compute the matching stop-loss. Entries
//! whose level has already been crossed, whose paired exit line is
//! missing or inverted, or whose risk/reward is unfavorable are
//! skipped with a logged reason.

use crate::context::CycleContext;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use talos_core::{
    round_to_tick, DesiredOrder, OrderBatch, OrderTag, Side, TrendKind, TrendLine,
};
use talos_ports::{BotEvent, Notifier};

/// Configuration for the band-trade generator
#[derive(Debug, Clone)]
pub struct BandConfig {
    /// Entry offset from the predicted level (fraction)
    pub entry_band_pct: Decimal,
    /// Order size as a fraction of account margin
    pub order_size_fraction: Decimal,
    /// Leverage used for sizing and stop placement
    pub leverage: Decimal,
    /// ROE fraction risked by the stop-loss
    pub sl_pct: Decimal,
    /// Trades at or above this risk/reward ratio are not worth entering
    pub rr_limit: Decimal,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            entry_band_pct: dec!(0.02),
            order_size_fraction: dec!(0.01),
            leverage: dec!(10),
            sl_pct: dec!(0.20),
            rr_limit: dec!(1.5),
        }
    }
}

/// Trade between support and resistance lines, post-only in spirit:
/// orders that would execute immediately are skipped instead.
pub struct BandTradeStrategy {
    config: BandConfig,
}

impl BandTradeStrategy {
    pub fn new(config: BandConfig) -> Self {
        Self { config }
    }

    /// Propose entries for every band-typed trend line.
    pub fn propose(&self, ctx: &CycleContext, notifier: &dyn Notifier) -> OrderBatch {
        let mut batch = OrderBatch::default();
        for line in ctx.trends.iter() {
            if line.kind != TrendKind::Band {
                continue;
            }
            if let Some(order) = self.propose_line(ctx, line, notifier) {
                let (entry, stop) = order;
                batch.push(entry);
                batch.push(stop);
            }
        }
        batch
    }

    fn propose_line(
        &self,
        ctx: &CycleContext,
        line: &TrendLine,
        notifier: &dyn Notifier,
    ) -> Option<(DesiredOrder, DesiredOrder)> {
        let side = line.band_side()?;
        let sign = side.sign();
        let tick = ctx.instrument.tick_size;
        let entry_factor = Decimal::ONE + sign * self.config.entry_band_pct;
        let exit_factor = Decimal::ONE - sign * (self.config.entry_band_pct + dec!(0.01));

        let entry_price = round_to_tick(ctx.predicted(line) * entry_factor, tick);
        let bid = ctx.instrument.bid_price?;
        let ask = ctx.instrument.ask_price?;

        // Level already crossed: stale or invalid signal, leave it alone.
        let crossed = match side {
            Side::Sell => entry_price < dec!(0.98) * bid,
            Side::Buy => entry_price > dec!(1.02) * ask,
        };
        if crossed {
            let reason = format!(
                "{} entry at {entry_price} already crossed (bid {bid} / ask {ask})",
                side.as_str()
            );
            info!("BTW: {}: {reason}", line.name);
            notifier.event(&BotEvent::SignalSkipped {
                trend: line.name.clone(),
                reason,
            });
            return None;
        }

        // Symmetric line gives the exit; a missing pair leaves exit at
        // zero, which the direction check below rejects.
        let exit_prefix = match side {
            Side::Buy => "higher",
            Side::Sell => "lower",
        };
        let exit_price = ctx
            .trends
            .paired(&line.name, exit_prefix)
            .map(|pair| round_to_tick(ctx.predicted(pair) * exit_factor, tick))
            .unwrap_or(Decimal::ZERO);

        let valid_trend = match side {
            Side::Buy => entry_price < exit_price,
            Side::Sell => entry_price > exit_price,
        };
        if !valid_trend {
            info!(
                "BTW: trend no longer valid for {} {}: entry {entry_price} exit {exit_price}",
                side.as_str(),
                line.name
            );
            notifier.event(&BotEvent::SignalSkipped {
                trend: line.name.clone(),
                reason: format!("trend no longer valid: entry {entry_price} exit {exit_price}"),
            });
            return None;
        }

        let size = (entry_price
            * ctx.account_margin_xbt()
            * self.config.order_size_fraction
            * self.config.leverage)
            .trunc();
        if size <= Decimal::ZERO {
            debug!("BTW: {} sized to zero contracts, skipping", line.name);
            return None;
        }

        let trade = talos_calc::profit_loss(
            size,
            entry_price,
            exit_price,
            self.config.leverage,
            ctx.instrument.funding_rate,
            side == Side::Sell,
        );
        let rr = talos_calc::risk_reward(
            entry_price,
            exit_price,
            size,
            self.config.leverage,
            self.config.sl_pct,
        );
        if rr.ratio >= self.config.rr_limit {
            let reason = format!(
                "possible PL {:.2}% at RR {:.2}, not worth entering",
                trade.pnl_pct * dec!(100),
                rr.ratio
            );
            info!("BTW: {}: {reason}", line.name);
            notifier.event(&BotEvent::SignalSkipped {
                trend: line.name.clone(),
                reason,
            });
            return None;
        }

        info!(
            "BTW: RR {:.2} entry {entry_price} exit {exit_price} SL {:.1} {}",
            rr.ratio, rr.stop_price, line.name
        );
        let entry = DesiredOrder::limit(side, entry_price, size, OrderTag::entry(side, &line.name));
        let stop = DesiredOrder::stop(
            side.opposite(),
            round_to_tick(rr.stop_price, tick),
            size,
            OrderTag::stop_loss(&line.name),
        )
        .reduce_only();
        Some((entry, stop))
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
            kind: TrendKind::Band,
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
                wallet_balance: dec!(100_000_000), // 1 XBT
                available_margin: dec!(100_000_000),
            },
            trends: TrendSet::new(lines),
        }
    }

    #[test]
    fn test_band_pair_emits_entry_and_stop() {
        let ctx = context(
            vec![flat_line("lower_A", dec!(100)), flat_line("higher_A", dec!(110))],
            dec!(99),
            dec!(101),
        );
        let batch = BandTradeStrategy::new(BandConfig::default()).propose(&ctx, &NullNotifier);

        // One Buy limit entry near 100 plus one Sell stop-loss.
        assert_eq!(batch.buys.len(), 1);
        assert_eq!(batch.sells.len(), 1);
        let entry = &batch.buys[0];
        assert_eq!(entry.kind, OrderKind::Limit);
        assert_eq!(entry.price, dec!(102)); // 100 * 1.02
        assert_eq!(entry.tag.encode(), "Buy lower_A");
        let stop = &batch.sells[0];
        assert_eq!(stop.kind, OrderKind::Stop);
        assert!(stop.reduce_only);
        assert!(stop.price < entry.price);
        assert_eq!(stop.tag.encode(), "SL lower_A");
        assert_eq!(stop.qty, entry.qty);
    }

    #[test]
    fn test_unfavorable_risk_reward_skips() {
        // Exit barely above entry: reward tiny, RR blows past the limit.
        let ctx = context(
            vec![flat_line("lower_A", dec!(100)), flat_line("higher_A", dec!(106))],
            dec!(99),
            dec!(101),
        );
        let batch = BandTradeStrategy::new(BandConfig::default()).propose(&ctx, &NullNotifier);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_missing_pair_skips() {
        let ctx = context(vec![flat_line("lower_A", dec!(100))], dec!(99), dec!(101));
        let batch = BandTradeStrategy::new(BandConfig::default()).propose(&ctx, &NullNotifier);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_crossed_entry_skips() {
        // Buy entry at 102 while the ask has collapsed far below it.
        let ctx = context(
            vec![flat_line("lower_A", dec!(100)), flat_line("higher_A", dec!(110))],
            dec!(90),
            dec!(91),
        );
        let batch = BandTradeStrategy::new(BandConfig::default()).propose(&ctx, &NullNotifier);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_sell_side_orientation() {
        let ctx = context(
            vec![flat_line("higher_B", dec!(110)), flat_line("lower_B", dec!(100))],
            dec!(104),
            dec!(105),
        );
        let batch = BandTradeStrategy::new(BandConfig::default()).propose(&ctx, &NullNotifier);
        assert_eq!(batch.sells.len(), 1);
        let entry = &batch.sells[0];
        assert_eq!(entry.price, dec!(108.0)); // 110 * 0.98, rounded to tick
        assert_eq!(entry.tag.encode(), "Sell higher_B");
        let stop = &batch.buys[0];
        assert!(stop.price > entry.price);
    }
}
