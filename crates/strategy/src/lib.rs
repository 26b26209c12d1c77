//! Talos Strategy
//!
//! Turns trend-line levels, the order book top, and account margin
//! into desired entry orders. Two independent generators:
//! - band trade: passive limit entries between converging levels
//! - breakout: stop orders that trigger market entry when a level breaks
//!
//! Both run only while the position is flat; once a position exists
//! the risk manager owns the order book.

pub mod band;
pub mod breakout;
pub mod context;

pub use band::{BandConfig, BandTradeStrategy};
pub use breakout::{BreakoutConfig, BreakoutStrategy};
pub use context::{CycleCarry, CycleContext};
