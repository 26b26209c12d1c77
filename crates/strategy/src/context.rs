//! Per-cycle decision context
//!
//! `CycleContext` is constructed fresh at the top of every decision
//! cycle from exchange snapshots and discarded at its end; nothing in
//! it survives across cycles. The few values that must survive live in
//! `CycleCarry`.

use rust_decimal::Decimal;
use talos_core::{Instrument, MarginSnapshot, PositionSnapshot, TrendLine, TrendSet};

/// Everything a decision function may read this cycle.
#[derive(Debug, Clone)]
pub struct CycleContext {
    pub instrument: Instrument,
    pub position: PositionSnapshot,
    pub margin: MarginSnapshot,
    pub trends: TrendSet,
}

impl CycleContext {
    /// Predicted price of a trend line at this cycle's instrument timestamp.
    pub fn predicted(&self, line: &TrendLine) -> Decimal {
        line.predicted_price(self.instrument.timestamp)
    }

    /// Account margin in XBT, the sizing base for entries.
    pub fn account_margin_xbt(&self) -> Decimal {
        self.margin.wallet_balance_xbt()
    }
}

/// Cross-cycle state, deliberately small.
#[derive(Debug, Clone, Default)]
pub struct CycleCarry {
    /// Mark price seen by the previous cycle; gates trailing-stop updates
    pub last_mark_price: Option<Decimal>,
    /// Position size at startup
    pub starting_qty: Decimal,
    /// Position size as of the last cycle
    pub running_qty: Decimal,
}

impl CycleCarry {
    pub fn contracts_traded(&self) -> Decimal {
        self.running_qty - self.starting_qty
    }
}
