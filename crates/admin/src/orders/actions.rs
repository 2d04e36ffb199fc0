//! Which order actions are offered, and how refunds are routed.

use shop_console_core::{
    CancellationStatus, OrderStatus, PaymentStatus, Price, RefundStatus, RevenueStatus,
};

use super::WorkflowError;
use crate::models::Order;

/// How a refund is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundPlan {
    /// Online payment refunded in full; the backend computes the amount.
    Full { amount: Price },
    /// Only the upfront part of a COD order is refunded.
    CodUpfront { amount: Price },
}

impl RefundPlan {
    /// Route a refund for `order`.
    ///
    /// # Errors
    ///
    /// `NotAvailable` unless the cancellation was approved and money was
    /// collected; `Transition` when a refund is already running or done.
    pub fn for_order(order: &Order) -> Result<Self, WorkflowError> {
        if order.cancellation_status != CancellationStatus::Approved {
            return Err(WorkflowError::NotAvailable(
                "Refunds are only available for approved cancellations".to_string(),
            ));
        }
        let status = order.effective_refund_status().ok_or_else(|| {
            WorkflowError::NotAvailable("No payment was collected for this order".to_string())
        })?;
        status.begin()?;

        if order.is_cod() {
            let upfront = order.upfront();
            if upfront.is_positive() {
                return Ok(Self::CodUpfront { amount: upfront });
            }
        } else if order.payment_status == PaymentStatus::Completed {
            return Ok(Self::Full {
                amount: order.total_amount,
            });
        }
        Err(WorkflowError::NotAvailable(
            "No payment was collected for this order".to_string(),
        ))
    }

    #[must_use]
    pub const fn amount(self) -> Price {
        match self {
            Self::Full { amount } | Self::CodUpfront { amount } => amount,
        }
    }

    #[must_use]
    pub const fn is_cod(self) -> bool {
        matches!(self, Self::CodUpfront { .. })
    }
}

/// Controls enabled for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderActions {
    pub can_update_status: bool,
    pub can_decide_cancellation: bool,
    /// Present when a refund (or a retry) can be issued.
    pub refund: Option<RefundPlan>,
    /// The last refund attempt failed.
    pub retry_refund: bool,
    pub can_confirm_cod: bool,
    /// Prefilled amount for COD confirmation.
    pub suggested_cod_amount: Option<Price>,
}

impl OrderActions {
    #[must_use]
    pub fn for_order(order: &Order) -> Self {
        let refund = RefundPlan::for_order(order).ok();
        let can_confirm_cod = can_confirm_cod(order);
        Self {
            can_update_status: !order.cancellation_status.locks_order_status(),
            can_decide_cancellation: order.has_pending_cancellation(),
            refund,
            retry_refund: refund.is_some()
                && order.effective_refund_status() == Some(RefundStatus::Failed),
            can_confirm_cod,
            suggested_cod_amount: can_confirm_cod.then(|| suggested_cod_amount(order)),
        }
    }
}

/// `cod ∧ delivered ∧ earned`.
#[must_use]
pub fn can_confirm_cod(order: &Order) -> bool {
    order.is_cod()
        && order.order_status == OrderStatus::Delivered
        && order.revenue_status == RevenueStatus::Earned
}

/// Remaining amount when positive, otherwise the order total.
#[must_use]
pub fn suggested_cod_amount(order: &Order) -> Price {
    order
        .remaining_amount
        .filter(Price::is_positive)
        .unwrap_or(order.total_amount)
}
