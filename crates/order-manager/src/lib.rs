//! Talos Order Manager
//!
//! Reconciles the order set the strategies want with the orders that
//! actually rest on the exchange. Identity-matched orders are amended
//! in place rather than cancel-replaced, keeping queue priority and
//! API usage low.

pub mod converge;
pub mod executor;

pub use converge::{plan, ConvergencePlan};
pub use executor::{execute, ExecutionReport};
