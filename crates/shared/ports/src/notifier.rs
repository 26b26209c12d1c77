//! Operational status notifications
//!
//! Fire-and-forget: notifier methods are infallible and must never
//! abort a decision cycle. The runner ships a log-backed
//! implementation; alerting transports plug in behind this trait.

use rust_decimal::Decimal;

/// Per-cycle account/position summary
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub balance_xbt: Decimal,
    pub position_qty: Decimal,
    /// Contracts traded this run
    pub delta: Decimal,
    pub mark_price: Decimal,
}

/// Discrete events worth surfacing to operators
#[derive(Debug, Clone)]
pub enum BotEvent {
    OrdersCreated { count: usize },
    OrdersAmended { count: usize },
    OrdersCancelled { count: usize },
    SignalSkipped { trend: String, reason: String },
    CycleAborted { reason: String },
}

pub trait Notifier: Send + Sync {
    fn status(&self, _report: &StatusReport) {}
    fn event(&self, _event: &BotEvent) {}
}

/// Notifier that drops everything
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {}
