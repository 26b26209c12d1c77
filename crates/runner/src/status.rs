//! Log-backed notifier

use log::{info, warn};
use talos_ports::{BotEvent, Notifier, StatusReport};

/// Writes status and events through `log`.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn status(&self, report: &StatusReport) {
        info!("Current XBT Balance: {:.6}", report.balance_xbt);
        info!(
            "Current Contract Position: {} (delta this run: {})",
            report.position_qty, report.delta
        );
        info!("Current Mark Price: {}", report.mark_price);
    }

    fn event(&self, event: &BotEvent) {
        match event {
            BotEvent::OrdersCreated { count } => info!("Submitted {count} new orders"),
            BotEvent::OrdersAmended { count } => info!("Amended {count} resting orders"),
            BotEvent::OrdersCancelled { count } => info!("Cancelled {count} resting orders"),
            BotEvent::SignalSkipped { trend, reason } => {
                info!("Skipping {trend}: {reason}")
            }
            BotEvent::CycleAborted { reason } => warn!("Cycle aborted: {reason}"),
        }
    }
}
