//! Talos Core Domain
//!
//! Pure domain types for the talos trading agent.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod instrument;
pub mod margin;
pub mod order;
pub mod position;
pub mod tag;
pub mod trend;
pub mod values;

// Re-export commonly used types at crate root
pub use instrument::{Instrument, MarketState};
pub use margin::MarginSnapshot;
pub use order::{
    AmendOrder, CreateOrder, DesiredOrder, FillRecord, LiveOrder, LiveOrderStatus, OrderBatch,
    OrderKind, Side,
};
pub use position::PositionSnapshot;
pub use tag::{OrderRole, OrderTag, Tranche};
pub use trend::{TrendKind, TrendLine, TrendSet};
pub use values::round_to_tick;
