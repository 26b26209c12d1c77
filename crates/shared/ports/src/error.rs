//! Error taxonomy for the exchange and trend-provider ports

use thiserror::Error;

/// Errors surfaced by the exchange collaborator.
///
/// Only `StaleOrderState` and `ConnectionLost` are locally
/// recoverable; everything else either aborts the cycle or the
/// process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Instrument {symbol} is not open. State: {state}")]
    MarketClosed { symbol: String, state: String },

    #[error("Orderbook is empty, cannot quote")]
    MarketEmpty,

    #[error("Order status changed while amending (filled or canceled mid-flight)")]
    StaleOrderState,

    #[error("Not authenticated: {0}")]
    Auth(String),

    #[error("Realtime data connection lost")]
    ConnectionLost,

    #[error("Order rejected: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ExchangeError {
    /// Retryable by restarting the decision cycle.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleOrderState)
    }

    /// Non-retryable within a shutdown cancellation attempt.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;

/// Errors from the trend-level provider
#[derive(Error, Debug)]
pub enum TrendError {
    #[error("Failed to read trend lines: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed trend line record: {0}")]
    Malformed(String),
}
