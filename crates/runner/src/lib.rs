//! Talos Runner
//!
//! Wires the strategies, risk manager and order manager into the
//! polling decision loop, handles settings, trend-line loading,
//! status logging and shutdown.

pub mod bootstrap;
pub mod cycle;
pub mod status;
pub mod trends;

pub use bootstrap::{BootstrapError, Settings};
pub use cycle::{CycleOutcome, Trader};
pub use status::LogNotifier;
pub use trends::{FixedTrendSource, JsonTrendSource};
