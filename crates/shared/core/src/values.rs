//! Shared value helpers

use rust_decimal::Decimal;

/// Satoshi per XBT; exchange margin figures arrive in XBt.
pub const XBT_TO_XBT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Round a price to the nearest multiple of the instrument tick size.
pub fn round_to_tick(price: Decimal, tick_size: Decimal) -> Decimal {
    (price / tick_size).round() * tick_size
}
