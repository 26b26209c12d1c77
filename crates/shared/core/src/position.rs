//! Position snapshot as reported by the exchange
//!
//! Mutated only by the exchange (fills); the decision logic reads a
//! fresh snapshot each cycle and never writes back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub symbol: String,
    /// Net contracts; positive = long, negative = short
    pub current_qty: Decimal,
    pub avg_entry_price: Decimal,
    pub leverage: Decimal,
    /// Position margin (XBt)
    pub pos_margin: Decimal,
    /// Maintenance margin (XBt)
    pub maint_margin: Decimal,
    pub liquidation_price: Decimal,
    pub unrealised_pnl: Decimal,
    pub realised_pnl: Decimal,
}

impl PositionSnapshot {
    pub fn flat(symbol: impl Into<String>, leverage: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            current_qty: Decimal::ZERO,
            avg_entry_price: Decimal::ZERO,
            leverage,
            pos_margin: Decimal::ZERO,
            maint_margin: Decimal::ZERO,
            liquidation_price: Decimal::ZERO,
            unrealised_pnl: Decimal::ZERO,
            realised_pnl: Decimal::ZERO,
        }
    }

    pub fn is_long(&self) -> bool {
        self.current_qty > Decimal::ZERO
    }

    pub fn is_short(&self) -> bool {
        self.current_qty < Decimal::ZERO
    }

    pub fn is_flat(&self) -> bool {
        self.current_qty.is_zero()
    }

    /// Absolute position size in contracts, truncated to whole contracts.
    pub fn abs_size(&self) -> Decimal {
        self.current_qty.abs().trunc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_helpers() {
        let mut pos = PositionSnapshot::flat("XBTUSD", dec!(10));
        assert!(pos.is_flat());

        pos.current_qty = dec!(1000);
        assert!(pos.is_long() && !pos.is_short());

        pos.current_qty = dec!(-250.0);
        assert!(pos.is_short());
        assert_eq!(pos.abs_size(), dec!(250));
    }
}
