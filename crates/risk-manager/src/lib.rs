//! Talos Risk Manager
//!
//! Owns the order book once a position exists: derives tranche-based
//! take-profits and fixed/trailing stop-losses from the position and
//! the strategy that produced the last fill (recovered from order-ID
//! metadata), and prunes stale entry orders left from the flat phase.

pub mod manager;
pub mod origin;
pub mod prune;
pub mod symmetric;
pub mod tranche;

pub use manager::{RiskConfig, RiskDecision, RiskManager};
pub use origin::FillOrigin;
