//! Header counts for the order list.

use std::collections::BTreeMap;

use shop_console_core::{OrderStatus, Price, RefundStatus};

use super::actions::can_confirm_cod;
use crate::models::Order;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSummary {
    pub total: usize,
    pub by_status: BTreeMap<OrderStatus, usize>,
    pub pending_cancellations: usize,
    /// Approved cancellations whose refund is pending or failed.
    pub refunds_outstanding: usize,
    pub awaiting_cod_confirmation: usize,
    /// Sum of `totalAmount` over orders not cancelled.
    pub gross: Price,
}

impl OrderSummary {
    #[must_use]
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut summary = Self::default();
        for order in orders {
            summary.total += 1;
            *summary.by_status.entry(order.order_status).or_default() += 1;
            if order.has_pending_cancellation() {
                summary.pending_cancellations += 1;
            }
            if matches!(
                order.effective_refund_status(),
                Some(RefundStatus::Pending | RefundStatus::Failed)
            ) {
                summary.refunds_outstanding += 1;
            }
            if can_confirm_cod(order) {
                summary.awaiting_cod_confirmation += 1;
            }
            if order.order_status != OrderStatus::Cancelled {
                summary.gross = summary.gross + order.total_amount;
            }
        }
        summary
    }

    #[must_use]
    pub fn count(&self, status: OrderStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use shop_console_core::{CancellationStatus, PaymentMethod, PaymentStatus, RevenueStatus};

    use super::*;

    #[test]
    fn test_counts() {
        let mut delivered_cod = Order::new("a", Price::from_units(500));
        delivered_cod.payment_method = PaymentMethod::Cod;
        delivered_cod.order_status = OrderStatus::Delivered;
        delivered_cod.revenue_status = RevenueStatus::Earned;

        let mut requested = Order::new("b", Price::from_units(300));
        requested.cancellation_status = CancellationStatus::Requested;

        let mut refund_due = Order::new("c", Price::from_units(200));
        refund_due.order_status = OrderStatus::Cancelled;
        refund_due.cancellation_status = CancellationStatus::Approved;
        refund_due.payment_status = PaymentStatus::Completed;

        let orders = [delivered_cod, requested, refund_due];
        let summary = OrderSummary::from_orders(&orders);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.count(OrderStatus::Delivered), 1);
        assert_eq!(summary.count(OrderStatus::Shipped), 0);
        assert_eq!(summary.pending_cancellations, 1);
        assert_eq!(summary.refunds_outstanding, 1);
        assert_eq!(summary.awaiting_cod_confirmation, 1);
        assert_eq!(summary.gross, Price::from_units(800));
    }
}
