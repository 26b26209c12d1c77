//! Talos Ports
//!
//! Traits at the seams of the system: the exchange collaborator, the
//! trend-level provider, and the fire-and-forget status notifier,
//! together with the error taxonomy the control loop recovers from.

pub mod error;
pub mod exchange;
pub mod notifier;
pub mod trends;

pub use error::{ExchangeError, ExchangeResult, TrendError};
pub use exchange::Exchange;
pub use notifier::{BotEvent, Notifier, StatusReport};
pub use trends::TrendSource;
