//! Band-position exit generator
//!
//! Positions opened between paired trend lines exit at the opposite
//! line of the pair: a long entered off `lower_X` targets `higher_X`,
//! a short targets `lower_X`. The stop is sized off the configured
//! risk fraction and clamped inside the liquidation price. When the
//! target carries enough profit the position exits in two halves.

use crate::manager::RiskConfig;
use log::{info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use talos_core::{round_to_tick, DesiredOrder, FillRecord, OrderBatch, OrderTag, Side, Tranche};
use talos_strategy::CycleContext;

/// Splitting the exit in two only pays when the target profit on
/// margin is at least this fraction.
const SPLIT_PNL_PCT: Decimal = dec!(0.5);

/// Generate take-profit and stop-loss orders for a band-origin position.
pub fn generate(
    config: &RiskConfig,
    ctx: &CycleContext,
    last_fill: &FillRecord,
    trend: &str,
) -> OrderBatch {
    let pos = &ctx.position;
    let entry_price = pos.avg_entry_price;
    let pos_size = pos.abs_size();
    let leverage = pos.leverage;
    let tick = ctx.instrument.tick_size;

    let (pair_prefix, tp_side, short, sign) = match last_fill.side {
        Side::Buy => ("higher", Side::Sell, false, Decimal::ONE),
        Side::Sell => ("lower", Side::Buy, true, Decimal::NEGATIVE_ONE),
    };

    let mut batch = OrderBatch::default();
    let Some(pair) = ctx.trends.paired(trend, pair_prefix) else {
        // The opposite line of the pair is gone; fall back to fixed
        // exits off entry price.
        warn!("No {pair_prefix} pair for {trend}, using fixed exits");
        let sl = talos_calc::exit_price_for_roe(pos_size, entry_price, sign * -config.roe_sl, leverage)
            .raw;
        let tp = talos_calc::exit_price_for_pl(pos_size, entry_price, sign * dec!(0.1), leverage).raw;
        batch.push(
            DesiredOrder::limit(
                tp_side,
                round_to_tick(tp, tick),
                pos_size,
                OrderTag::take_profit(None, trend),
            )
            .reduce_only(),
        );
        batch.push(
            DesiredOrder::stop(
                tp_side,
                round_to_tick(sl, tick),
                pos_size,
                OrderTag::stop_loss(trend),
            )
            .reduce_only(),
        );
        return batch;
    };

    let exit_factor = Decimal::ONE + sign * (-config.band_pct - dec!(0.01));
    let exit = round_to_tick(ctx.predicted(pair) * exit_factor, tick);

    let rr = talos_calc::risk_reward(entry_price, exit, pos_size, leverage, config.roe_sl);
    let liq = pos.liquidation_price;
    // Keep the stop on the live side of liquidation.
    let sl = if short {
        if liq > rr.stop_price {
            rr.stop_price
        } else {
            liq * dec!(0.99)
        }
    } else {
        if liq < rr.stop_price {
            rr.stop_price
        } else {
            liq * dec!(1.01)
        }
    };

    let trade = talos_calc::profit_loss(
        pos_size,
        entry_price,
        exit,
        leverage,
        ctx.instrument.funding_rate,
        short,
    );
    info!(
        "Band exit for {trend}: target {exit}, stop {sl}, pnl_pct {}",
        trade.pnl_pct
    );

    if trade.pnl_pct >= SPLIT_PNL_PCT {
        let pl_half = sign * trade.pnl_pct / dec!(2);
        let exit_half =
            talos_calc::exit_price_for_pl(pos_size, entry_price, pl_half, leverage).raw;
        let half_qty = (pos_size / dec!(2)).trunc();
        let left_qty = pos_size - half_qty;
        batch.push(
            DesiredOrder::limit(
                tp_side,
                round_to_tick(exit_half, tick),
                half_qty,
                OrderTag::take_profit(Some(Tranche::BandHalf), trend),
            )
            .reduce_only(),
        );
        batch.push(
            DesiredOrder::limit(
                tp_side,
                exit,
                left_qty,
                OrderTag::take_profit(Some(Tranche::BandRest), trend),
            )
            .reduce_only(),
        );
    } else {
        batch.push(
            DesiredOrder::limit(tp_side, exit, pos_size, OrderTag::take_profit(None, trend))
                .reduce_only(),
        );
    }
    batch.push(
        DesiredOrder::stop(
            tp_side,
            round_to_tick(sl, tick),
            pos_size,
            OrderTag::stop_loss(trend),
        )
        .reduce_only(),
    );
    batch
}
