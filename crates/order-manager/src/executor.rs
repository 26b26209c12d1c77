//! Plan execution
//!
//! Applies a convergence plan against the exchange: amends first so
//! resting orders keep their IDs, then creates, then cancels. A stale
//! order-state rejection is propagated for the caller to retry with a
//! fresh book snapshot; anything else is fatal for the cycle.

use crate::converge::ConvergencePlan;
use log::info;
use talos_ports::{BotEvent, Exchange, ExchangeResult, Notifier};

/// What an executed plan actually did
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub amended: usize,
    pub created: usize,
    pub cancelled: usize,
}

/// Apply a convergence plan to the exchange.
pub async fn execute(
    exchange: &dyn Exchange,
    plan: ConvergencePlan,
    notifier: &dyn Notifier,
) -> ExchangeResult<ExecutionReport> {
    let mut report = ExecutionReport::default();

    if !plan.amends.is_empty() {
        report.amended = plan.amends.len();
        exchange.amend_orders(plan.amends).await?;
        info!("Amended {} orders", report.amended);
        notifier.event(&BotEvent::OrdersAmended {
            count: report.amended,
        });
    }

    if !plan.creates.is_empty() {
        // Submit newest-decided first, matching the decision log order.
        let mut creates = plan.creates;
        creates.reverse();
        report.created = creates.len();
        exchange.create_orders(creates).await?;
        info!("Created {} orders", report.created);
        notifier.event(&BotEvent::OrdersCreated {
            count: report.created,
        });
    }

    if !plan.cancels.is_empty() {
        report.cancelled = plan.cancels.len();
        exchange.cancel_orders(plan.cancels).await?;
        info!("Cancelled {} orders", report.cancelled);
        notifier.event(&BotEvent::OrdersCancelled {
            count: report.cancelled,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converge;
    use exchange_sim::SimExchange;
    use rust_decimal_macros::dec;
    use talos_core::{DesiredOrder, OrderBatch, OrderTag, Side};
    use talos_ports::notifier::NullNotifier;

    fn one_buy() -> OrderBatch {
        let mut desired = OrderBatch::default();
        desired.push(DesiredOrder::limit(
            Side::Buy,
            dec!(9900),
            dec!(500),
            OrderTag::entry(Side::Buy, "lower_A"),
        ));
        desired
    }

    #[tokio::test]
    async fn test_execute_creates_then_amends() {
        let sim = SimExchange::flat_xbtusd();

        let plan = converge::plan(&one_buy(), &[]);
        let report = execute(&sim, plan, &NullNotifier).await.unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.amended, 0);

        // Same identity at a new price amends the resting order.
        let mut desired = OrderBatch::default();
        desired.push(DesiredOrder::limit(
            Side::Buy,
            dec!(9950),
            dec!(500),
            OrderTag::entry(Side::Buy, "lower_A"),
        ));
        let live = sim.orders().await;
        let plan = converge::plan(&desired, &live);
        let report = execute(&sim, plan, &NullNotifier).await.unwrap();
        assert_eq!(report.created, 0);
        assert_eq!(report.amended, 1);
        assert_eq!(sim.orders().await[0].price, Some(dec!(9950)));
    }

    #[tokio::test]
    async fn test_stale_amend_propagates() {
        let sim = SimExchange::flat_xbtusd();
        let plan = converge::plan(&one_buy(), &[]);
        execute(&sim, plan, &NullNotifier).await.unwrap();

        sim.fail_next_amend().await;
        let mut desired = OrderBatch::default();
        desired.push(DesiredOrder::limit(
            Side::Buy,
            dec!(9950),
            dec!(500),
            OrderTag::entry(Side::Buy, "lower_A"),
        ));
        let live = sim.orders().await;
        let plan = converge::plan(&desired, &live);
        let err = execute(&sim, plan, &NullNotifier).await.unwrap_err();
        assert!(err.is_stale());
    }
}
