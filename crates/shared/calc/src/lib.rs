//! Talos Financial Calculator
//!
//! Pure, deterministic functions over the inverse-contract model
//! (position value in margin currency = contracts / price).
//! No state, no I/O.

pub mod inverse;

pub use inverse::{
    ExitPrices, RiskReward, TradeBreakdown, exit_price_for_pl, exit_price_for_roe, liq_price,
    maint_margin, profit_loss, risk_reward, roe_at_liquidation, MAKER_FEE, TAKER_FEE,
};
