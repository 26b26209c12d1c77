//! Tranche take-profit / trailing-stop generator
//!
//! Used for breakout-origin positions and positions whose origin is
//! unknown. The entry quantity is split into 15%/25%/35%/remainder
//! tranches exiting at the 5%/8%/12% P&L milestones, with the last
//! slice riding a trailing stop once the 12% (`q3rt`) milestone has
//! been taken, capped at the 15% exit when the 18% level is crossed.

use crate::manager::RiskConfig;
use log::{info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use talos_core::{
    round_to_tick, DesiredOrder, FillRecord, OrderBatch, OrderRole, OrderTag, Side, Tranche,
};
use talos_strategy::{CycleCarry, CycleContext};

/// P&L milestones: quarter, half, three-quarter, final, trail cap.
const PL_QUART: Decimal = dec!(0.05);
const PL_HALF: Decimal = dec!(0.08);
const PL_TQUART: Decimal = dec!(0.12);
const PL_FINAL: Decimal = dec!(0.15);
const PL_FINAL_CLOSE: Decimal = dec!(0.18);

/// Tranche quantities derived from the originally-filled size.
/// Integer truncation is reconciled into the remainder slice, so the
/// four always sum to the entry size exactly.
pub fn tranche_sizes(entry_size: Decimal) -> (Decimal, Decimal, Decimal, Decimal) {
    let quart = (dec!(0.15) * entry_size).trunc();
    let half = (dec!(0.25) * entry_size).trunc();
    let tquart = (dec!(0.35) * entry_size).trunc();
    let left = entry_size - quart - half - tquart;
    (quart, half, tquart, left)
}

/// Recover the originally-filled quantity: the last fill if it was not
/// itself a take-profit, otherwise the most recent breakout-entry fill,
/// otherwise the current position size.
fn entry_position_size(
    current_size: Decimal,
    last_fill: Option<&FillRecord>,
    fills: &[FillRecord],
) -> Decimal {
    if let Some(fill) = last_fill {
        let is_tp = fill
            .tag()
            .is_some_and(|t| t.role == OrderRole::TakeProfit);
        if !is_tp {
            return fill.order_qty;
        }
    }
    let breakout_fill = fills.iter().find(|f| {
        f.tag()
            .is_some_and(|t| matches!(t.role, OrderRole::BreakoutEntry(_)))
    });
    match breakout_fill {
        Some(fill) => fill.order_qty,
        None => {
            warn!("Cannot find entry position size, assuming current size");
            current_size
        }
    }
}

/// Generate tranche TP orders and the stop-loss for the open position.
pub fn generate(
    config: &RiskConfig,
    ctx: &CycleContext,
    carry: &CycleCarry,
    last_fill: Option<&FillRecord>,
    fills: &[FillRecord],
) -> OrderBatch {
    let pos = &ctx.position;
    let entry_price = pos.avg_entry_price;
    let pos_size = pos.abs_size();
    let leverage = pos.leverage;
    let tick = ctx.instrument.tick_size;
    let mark_price = ctx.instrument.mark_price;
    let last_tag = last_fill.and_then(|f| f.tag());
    let trend_name = last_tag
        .as_ref()
        .map(|t| t.trend.clone())
        .unwrap_or_else(|| "None".to_string());

    let entry_size = entry_position_size(pos_size, last_fill, fills);
    // The remainder after the three tranches rides the stop-loss.
    let (qty_quart, qty_half, qty_tquart, _) = tranche_sizes(entry_size);

    // Trail candidate and whether the mark moved favorably since the
    // previous cycle; an unfavorable move freezes the trail (ratchet).
    let (tp_side, tp_sign, l_trade, update_trail) = if pos.is_short() {
        let bid = ctx.instrument.bid_price.unwrap_or(mark_price);
        let favorable = carry
            .last_mark_price
            .map(|last| mark_price < last)
            .unwrap_or(true);
        (
            Side::Buy,
            Decimal::NEGATIVE_ONE,
            bid * (Decimal::ONE - config.trail_pct),
            favorable,
        )
    } else {
        let ask = ctx.instrument.ask_price.unwrap_or(mark_price);
        let favorable = carry
            .last_mark_price
            .map(|last| mark_price > last)
            .unwrap_or(true);
        (
            Side::Sell,
            Decimal::ONE,
            ask * (Decimal::ONE + config.trail_pct),
            favorable,
        )
    };

    let filled_tranche = |tranche: Tranche| -> bool {
        last_tag
            .as_ref()
            .is_some_and(|t| t.role == OrderRole::TakeProfit && t.tranche == Some(tranche))
    };
    let tp_order = |qty: Decimal, milestone: Decimal, tranche: Tranche| -> DesiredOrder {
        let exit =
            talos_calc::exit_price_for_pl(pos_size, entry_price, tp_sign * milestone, leverage).raw;
        DesiredOrder::limit(
            tp_side,
            round_to_tick(exit, tick),
            qty,
            OrderTag::take_profit(Some(tranche), &trend_name),
        )
        .reduce_only()
    };
    let sl_order = |price: Decimal| -> DesiredOrder {
        DesiredOrder::stop(
            tp_side,
            round_to_tick(price, tick),
            pos_size,
            OrderTag::stop_loss(&trend_name),
        )
        .reduce_only()
    };

    let mut orders: Vec<DesiredOrder> = Vec::new();
    if !filled_tranche(Tranche::Quarter) {
        orders.push(tp_order(qty_quart, PL_QUART, Tranche::Quarter));
    }
    if !filled_tranche(Tranche::Half) {
        orders.push(tp_order(qty_half, PL_HALF, Tranche::Half));
    }
    if !filled_tranche(Tranche::ThreeQuarter) {
        orders.push(tp_order(qty_tquart, PL_TQUART, Tranche::ThreeQuarter));
    }

    let exit_sl_half =
        talos_calc::exit_price_for_pl(pos_size, entry_price, tp_sign * PL_HALF, leverage).raw;
    let exit_sl_final =
        talos_calc::exit_price_for_pl(pos_size, entry_price, tp_sign * PL_FINAL, leverage).raw;
    let exit_sl_final_close =
        talos_calc::exit_price_for_pl(pos_size, entry_price, tp_sign * PL_FINAL_CLOSE, leverage)
            .raw;

    let mut stop: Option<DesiredOrder> = None;
    if tp_side == Side::Sell && mark_price <= exit_sl_half {
        // Mark still near entry: fixed stop risking the configured ROE.
        info!("Setting stop loss, mark below half milestone");
        let sl_price =
            talos_calc::exit_price_for_roe(pos_size, entry_price, -tp_sign * config.roe_sl, leverage)
                .raw;
        stop = Some(sl_order(sl_price));
    } else if tp_side == Side::Buy && mark_price >= exit_sl_half {
        info!("Setting stop loss, mark below half milestone");
        let sl_price =
            talos_calc::exit_price_for_roe(pos_size, entry_price, -tp_sign * config.roe_sl, leverage)
                .raw;
        stop = Some(sl_order(sl_price));
    } else if filled_tranche(Tranche::ThreeQuarter) {
        // The q3rt milestone has been taken: trail from the book top,
        // capped at the final exit once the close level is crossed.
        if tp_side == Side::Buy && exit_sl_final_close <= mark_price {
            stop = Some(sl_order(exit_sl_final));
        }
        if tp_side == Side::Sell && exit_sl_final_close >= mark_price {
            stop = Some(sl_order(exit_sl_final));
        } else if tp_side == Side::Buy {
            if l_trade <= exit_sl_final_close {
                stop = Some(sl_order(exit_sl_final));
            } else if update_trail {
                stop = Some(sl_order(l_trade));
            }
        } else {
            if l_trade >= exit_sl_final_close {
                stop = Some(sl_order(exit_sl_final));
            } else if update_trail {
                stop = Some(sl_order(l_trade));
            }
        }
    } else {
        // Past the half milestone but q3rt not yet taken: lock in the
        // quarter-milestone profit.
        info!("Setting stop loss at the quarter milestone");
        let sl_price =
            talos_calc::exit_price_for_pl(pos_size, entry_price, tp_sign * PL_QUART, leverage).raw;
        stop = Some(sl_order(sl_price));
    }
    orders.extend(stop);

    let mut batch = OrderBatch::default();
    for order in orders {
        batch.push(order);
    }
    batch
}
