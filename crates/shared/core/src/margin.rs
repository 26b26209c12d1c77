//! Account margin snapshot

use crate::values::XBT_TO_XBT;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Margin figures arrive from the exchange in XBt (satoshi).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarginSnapshot {
    /// Total account margin (XBt)
    pub wallet_balance: Decimal,
    /// Available margin balance (XBt)
    pub available_margin: Decimal,
}

impl MarginSnapshot {
    pub fn wallet_balance_xbt(&self) -> Decimal {
        self.wallet_balance / XBT_TO_XBT
    }

    pub fn available_margin_xbt(&self) -> Decimal {
        self.available_margin / XBT_TO_XBT
    }
}
