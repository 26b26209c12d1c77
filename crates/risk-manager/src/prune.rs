//! Stale entry-order pruning
//!
//! Once a position exists, resting entry orders from the flat phase
//! are stale and get cancelled. Breakout triggers and protective
//! orders survive; the generators amend those into shape instead.

use talos_core::LiveOrder;

/// Live orders that no longer belong on the book with a position open.
pub fn stale_entry_orders(live: &[LiveOrder]) -> Vec<LiveOrder> {
    live.iter()
        .filter(|order| match &order.tag {
            Some(tag) => !tag.role.is_protective(),
            None => true,
        })
        .cloned()
        .collect()
}
