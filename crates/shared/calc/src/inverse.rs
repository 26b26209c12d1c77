//! Inverse-contract position arithmetic
//!
//! Entry is assumed to be a maker order, exit a taker order. All
//! functions take prices in quote currency and sizes in contracts and
//! work in the margin currency (XBT).
//!
//! Callers guarantee positive prices and nonzero leverage; a zero
//! divisor is a contract violation and panics.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fee for a maker order (0.025%)
pub const MAKER_FEE: Decimal = dec!(0.00025);
/// Fee for a taker order (0.075%)
pub const TAKER_FEE: Decimal = dec!(0.00075);

/// Full breakdown of a prospective entry/exit round trip
#[derive(Debug, Clone, PartialEq)]
pub struct TradeBreakdown {
    /// Margin committed, ignoring fees (XBT)
    pub margin_no_fees: Decimal,
    /// Margin including maintenance margin and entry/exit fees (XBT)
    pub margin_with_fees: Decimal,
    /// Position value at entry (XBT)
    pub entry_value: Decimal,
    /// Position value at exit (XBT)
    pub exit_value: Decimal,
    /// Profit/loss in margin currency (XBT)
    pub pnl: Decimal,
    /// Profit/loss as a fraction of exit price
    pub pnl_pct: Decimal,
    /// Return on equity, fee-naive
    pub roe: Decimal,
    /// Return on equity against the fee-adjusted margin
    pub roe_with_fees: Decimal,
}

/// Fee-naive and fee-adjusted exit price for a target return
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitPrices {
    pub raw: Decimal,
    pub with_fees: Decimal,
}

/// Risk/reward assessment of a prospective trade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskReward {
    /// |entry - stop| / |exit - entry|; below 1 means reward exceeds risk
    pub ratio: Decimal,
    /// Stop-loss price at the fixed ROE risk
    pub stop_price: Decimal,
}

/// P&L, ROE and margin figures for a round trip at the given prices.
///
/// Signs of `pnl`, `pnl_pct` and `roe` are flipped for shorts;
/// `roe_with_fees` is reported unflipped.
pub fn profit_loss(
    size: Decimal,
    entry_price: Decimal,
    exit_price: Decimal,
    leverage: Decimal,
    funding_rate: Decimal,
    short: bool,
) -> TradeBreakdown {
    let margin_no_fees = size / leverage / entry_price;
    let entry_value = size / entry_price;
    let entry_fees = entry_value * MAKER_FEE;
    let exit_value = size / exit_price;
    let exit_fees = exit_value * TAKER_FEE;
    let mut pnl = entry_value - exit_value;
    let mut roe = pnl / margin_no_fees;
    let mut pnl_pct = (exit_price - entry_price) / exit_price;
    let mm = maint_margin(size, entry_price, margin_no_fees, funding_rate);
    let margin_with_fees = margin_no_fees + mm + entry_fees + exit_fees;
    let roe_with_fees = pnl / margin_with_fees;
    if short {
        pnl = -pnl;
        pnl_pct = -pnl_pct;
        roe = -roe;
    }
    TradeBreakdown {
        margin_no_fees,
        margin_with_fees,
        entry_value,
        exit_value,
        pnl,
        pnl_pct,
        roe,
        roe_with_fees,
    }
}

/// Maintenance margin: 0.5% of entry value plus taker-fee and funding
/// cost evaluated at the bankruptcy-price approximation.
pub fn maint_margin(
    size: Decimal,
    entry_price: Decimal,
    margin_no_fees: Decimal,
    funding_rate: Decimal,
) -> Decimal {
    let entry_value = size / entry_price;
    let bankruptcy_price = size / (size / entry_price + margin_no_fees);
    let bankruptcy_value = size / bankruptcy_price;
    entry_value * dec!(0.005) + TAKER_FEE * bankruptcy_value + funding_rate * bankruptcy_value
}

/// Liquidation price for a position opened with the full available
/// margin at the given leverage.
///
/// The short side applies a flat -0.25% correction; the approximation
/// is known to be rough there and is reproduced as-is.
pub fn liq_price(
    avail_margin: Decimal,
    entry_price: Decimal,
    leverage: Decimal,
    short: bool,
) -> Decimal {
    let margin_no_fees = avail_margin;
    let size = entry_price * leverage * margin_no_fees;
    let entry_value = size / entry_price;
    let mm = entry_value * dec!(0.005);
    let (pos_sign, correction) = if short {
        (Decimal::NEGATIVE_ONE, dec!(-0.0025))
    } else {
        (Decimal::ONE, Decimal::ZERO)
    };
    let first_pass = size / (size / entry_price + pos_sign * (margin_no_fees - mm));
    let exit_value = size / first_pass;
    let exit_fees = exit_value * TAKER_FEE;
    let second_pass =
        size / (size / entry_price + pos_sign * (margin_no_fees - mm + pos_sign * exit_fees));
    second_pass + correction * second_pass
}

/// Exit price achieving a target ROE (negative for long stop-losses,
/// positive for short ones).
pub fn exit_price_for_roe(
    size: Decimal,
    entry_price: Decimal,
    target_roe: Decimal,
    leverage: Decimal,
) -> ExitPrices {
    let margin_no_fees = size / leverage / entry_price;
    let raw = entry_price / (Decimal::ONE - target_roe / leverage);
    let exit_value = size / raw;
    let maint_margin_limit = MAKER_FEE * exit_value;
    let maint_margin_pct = maint_margin_limit / margin_no_fees;
    let with_fees = entry_price / (Decimal::ONE - (target_roe + maint_margin_pct) / leverage);
    ExitPrices { raw, with_fees }
}

/// Exit price achieving a target P&L fraction (negative for shorts).
pub fn exit_price_for_pl(
    size: Decimal,
    entry_price: Decimal,
    target_pl: Decimal,
    leverage: Decimal,
) -> ExitPrices {
    exit_price_for_roe(size, entry_price, target_pl * leverage, leverage)
}

/// Closed-form liquidation ROE approximation.
///
/// At 100x leverage a long liquidates near ROE -65% and a short near
/// +24.5%, rescaled linearly by 100/leverage. Returns the ROE as a
/// fraction together with the fee-adjusted price at that ROE.
pub fn roe_at_liquidation(entry_price: Decimal, leverage: Decimal, short: bool) -> (Decimal, ExitPrices) {
    let hundred = dec!(100);
    let roe_liq = if short {
        let roe1 = hundred - dec!(24.5);
        -(hundred - roe1 / (hundred / leverage))
    } else {
        let roe1 = hundred - dec!(65);
        hundred - roe1 / (hundred / leverage)
    };
    let prices = exit_price_for_roe(dec!(20000), entry_price, -roe_liq / hundred, leverage);
    (roe_liq / hundred, prices)
}

/// Risk/reward of entering at `entry_price` targeting `exit_price`,
/// with the stop placed at a fixed `sl_pct` ROE risk.
///
/// Direction is inferred from the price ordering: entry below exit is
/// a long. Ratios below 1 mean the potential reward exceeds the risk.
pub fn risk_reward(
    entry_price: Decimal,
    exit_price: Decimal,
    size: Decimal,
    leverage: Decimal,
    sl_pct: Decimal,
) -> RiskReward {
    let roe_sl = if entry_price < exit_price {
        -sl_pct
    } else {
        sl_pct
    };
    let stop = exit_price_for_roe(size, entry_price, roe_sl, leverage).raw;
    // A target sitting exactly on the entry has zero reward; report
    // the worst representable ratio instead of dividing by zero.
    let reward = exit_price - entry_price;
    let ratio = if reward.is_zero() {
        Decimal::MAX
    } else {
        ((entry_price - stop) / reward).abs()
    };
    RiskReward {
        ratio,
        stop_price: stop,
    }
}
