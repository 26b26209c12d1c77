//! Order-book convergence
//!
//! Compares the desired order set against what actually rests on the
//! exchange and produces the minimal command set: amend orders whose
//! identity matches but whose price or quantity drifted, create the
//! rest. Amending in place keeps queue priority and stays under the
//! exchange's rate limits.
//!
//! Matching is by order identity (role, tranche, trend), never by
//! price. A desired order without a tranche accepts any live tranche,
//! so a take-profit that grew a tranche suffix keeps its live order.

use log::info;
use talos_core::{AmendOrder, CreateOrder, LiveOrder, OrderBatch};

/// Command set that converges the live book onto the desired one
#[derive(Debug, Default)]
pub struct ConvergencePlan {
    pub creates: Vec<CreateOrder>,
    pub amends: Vec<AmendOrder>,
    /// Exchange order IDs to cancel. Convergence itself never cancels;
    /// pruning decisions arrive from the risk manager already made.
    pub cancels: Vec<String>,
}

impl ConvergencePlan {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.amends.is_empty() && self.cancels.is_empty()
    }
}

/// Plan the commands that make the live book match `desired`.
///
/// Each live order is claimed by at most one desired order. Live
/// orders nothing claims are left alone.
pub fn plan(desired: &OrderBatch, live: &[LiveOrder]) -> ConvergencePlan {
    let mut out = ConvergencePlan::default();
    let mut claimed = vec![false; live.len()];

    for order in desired.iter() {
        let matched = live.iter().enumerate().find(|(i, candidate)| {
            !claimed[*i]
                && candidate
                    .tag
                    .as_ref()
                    .is_some_and(|tag| order.tag.matches(tag))
        });
        match matched {
            Some((i, existing)) => {
                claimed[i] = true;
                let price_drifted = existing.working_price() != Some(order.price);
                let qty_drifted = existing.leaves_qty != order.qty;
                if price_drifted || qty_drifted {
                    info!(
                        "Amending {}: {} {} @ {} -> {} @ {}",
                        existing.cl_ord_id,
                        existing.side.as_str(),
                        existing.leaves_qty,
                        existing
                            .working_price()
                            .map(|p| p.to_string())
                            .unwrap_or_else(|| "?".to_string()),
                        order.qty,
                        order.price,
                    );
                    out.amends.push(AmendOrder {
                        order_id: existing.order_id.clone(),
                        kind: order.kind,
                        side: order.side,
                        price: order.price,
                        qty: order.qty,
                    });
                }
            }
            None => {
                info!(
                    "Creating {}: {} {} @ {}",
                    order.tag.encode(),
                    order.side.as_str(),
                    order.qty,
                    order.price,
                );
                out.creates.push(CreateOrder::from_desired(order));
            }
        }
    }
    out
}
