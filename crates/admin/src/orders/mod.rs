//! Order workflow view.
//!
//! [`OrderConsole`] holds the loaded order list and drives every admin
//! action on it: status changes, cancellation decisions, refunds and COD
//! cash confirmation. Each action follows the same shape:
//!
//! 1. Check the move against the order's state machines. A rejected move
//!    posts an error notice and never reaches the network.
//! 2. Mark the order busy. A second action on the same order while one is
//!    running fails with [`WorkflowError::Busy`].
//! 3. Call the backend. Success posts the server's message (or a default),
//!    patches the local record and re-fetches the list; failure posts the
//!    server's message (or a per-action fallback).
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`, so actions on different orders can run concurrently.

mod actions;
mod error;
mod filter;
mod report;
mod summary;

pub use actions::{OrderActions, RefundPlan, can_confirm_cod, suggested_cod_amount};
pub use error::WorkflowError;
pub use filter::{CancellationBucket, OrderFilter};
pub use report::{ReportError, write_orders_csv};
pub use summary::OrderSummary;

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use shop_console_core::{
    CancellationDecision, CancellationStatus, OrderId, OrderStatus, PaymentStatus, Price,
    RefundOutcome, RefundStatus, RevenueStatus,
};
use tracing::{error, info, instrument, warn};

use crate::api::{AdminApi, ApiResponse, OrderActionData};
use crate::config::NoticeDurations;
use crate::http::ApiError;
use crate::inflight::{InFlight, InFlightGuard};
use crate::models::Order;
use crate::notices::{Notice, NoticeBoard};

#[derive(Debug, Default)]
struct ConsoleState {
    orders: Vec<Order>,
    filter: OrderFilter,
    notices: NoticeBoard,
    loaded: bool,
}

/// Order list state and actions.
#[derive(Debug)]
pub struct OrderConsole {
    api: AdminApi,
    state: Mutex<ConsoleState>,
    in_flight: InFlight<OrderId>,
}

impl OrderConsole {
    #[must_use]
    pub fn new(api: AdminApi, notices: NoticeDurations) -> Self {
        Self {
            api,
            state: Mutex::new(ConsoleState {
                notices: NoticeBoard::new(notices),
                ..ConsoleState::default()
            }),
            in_flight: InFlight::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Loading and reading
    // =========================================================================

    /// Fetch the order list, replacing the local copy.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Api` if the request fails; an error notice is
    /// posted and the previous list is kept.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<usize, WorkflowError> {
        match self.api.list_orders().await {
            Ok(response) => {
                let orders = response.data_or_default().orders;
                let count = orders.len();
                let mut state = self.state();
                state.orders = orders;
                state.loaded = true;
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "Failed to load orders");
                self.state()
                    .notices
                    .error(e.user_message("Failed to load orders"), Instant::now());
                Err(e.into())
            }
        }
    }

    /// Whether a load has succeeded at least once.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state().loaded
    }

    /// Every loaded order.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.state().orders.clone()
    }

    /// Orders passing the current filter, in list order.
    #[must_use]
    pub fn visible_orders(&self) -> Vec<Order> {
        let state = self.state();
        state.filter.apply(&state.orders).into_iter().cloned().collect()
    }

    #[must_use]
    pub fn filter(&self) -> OrderFilter {
        self.state().filter.clone()
    }

    pub fn set_filter(&self, filter: OrderFilter) {
        self.state().filter = filter;
    }

    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<Order> {
        self.state().orders.iter().find(|o| &o.id == id).cloned()
    }

    /// Controls offered for `id`; all disabled while it is busy.
    #[must_use]
    pub fn actions(&self, id: &OrderId) -> Option<OrderActions> {
        let order = self.order(id)?;
        let mut actions = OrderActions::for_order(&order);
        if self.is_busy(id) {
            actions.can_update_status = false;
            actions.can_decide_cancellation = false;
            actions.refund = None;
            actions.retry_refund = false;
            actions.can_confirm_cod = false;
        }
        Some(actions)
    }

    #[must_use]
    pub fn is_busy(&self, id: &OrderId) -> bool {
        self.in_flight.contains(id)
    }

    /// Counts over the whole list.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_orders(&self.state().orders)
    }

    /// Notices still visible at `now`.
    #[must_use]
    pub fn notices(&self, now: Instant) -> Vec<Notice> {
        self.state().notices.visible(now).to_vec()
    }

    /// Most recent notice, expired or not.
    #[must_use]
    pub fn latest_notice(&self) -> Option<Notice> {
        self.state().notices.latest().cloned()
    }

    /// Write the filtered orders as CSV.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if writing fails.
    pub fn export_csv<W: Write>(&self, out: W) -> Result<usize, ReportError> {
        let visible = self.visible_orders();
        let rows = write_orders_csv(&visible, out)?;
        info!(rows, "Exported order report");
        Ok(rows)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Set the fulfillment status.
    ///
    /// # Errors
    ///
    /// Local rejections (approved cancellation, unchanged status, busy) and
    /// backend failures.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn update_status(&self, id: &OrderId, target: OrderStatus) -> Result<(), WorkflowError> {
        let order = self.require(id)?;
        let next = order
            .order_status
            .transition_to(target, order.cancellation_status)
            .map_err(|e| self.reject(id, e.into()))?;

        let guard = self.begin(id)?;
        let result = self.api.update_order_status(id, next).await;
        drop(guard);

        match result {
            Ok(response) => {
                info!(order_id = %id, status = %next, "Order status updated");
                self.succeed(id, &response, "Order status updated", |o| {
                    o.order_status = next;
                });
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(self.fail(id, e, "Failed to update order status")),
        }
    }

    /// Approve a pending cancellation.
    ///
    /// # Errors
    ///
    /// See [`Self::decide_cancellation`].
    pub async fn approve_cancellation(&self, id: &OrderId) -> Result<(), WorkflowError> {
        self.decide_cancellation(id, CancellationDecision::Approve, None)
            .await
    }

    /// Reject a pending cancellation with a reason shown to the customer.
    ///
    /// # Errors
    ///
    /// See [`Self::decide_cancellation`].
    pub async fn reject_cancellation(&self, id: &OrderId, reason: &str) -> Result<(), WorkflowError> {
        self.decide_cancellation(id, CancellationDecision::Reject, Some(reason))
            .await
    }

    /// Decide a pending cancellation. COD and online orders use different
    /// endpoints.
    ///
    /// # Errors
    ///
    /// `NoPendingCancellation`, `MissingRejectionReason`, `Busy` or a backend
    /// failure.
    #[instrument(skip(self, decision, reason), fields(order_id = %id, %decision))]
    pub async fn decide_cancellation(
        &self,
        id: &OrderId,
        decision: CancellationDecision,
        reason: Option<&str>,
    ) -> Result<(), WorkflowError> {
        let order = self.require(id)?;
        let current = if order.has_pending_cancellation() {
            CancellationStatus::Requested
        } else {
            order.cancellation_status
        };
        let next = current
            .decide(decision)
            .map_err(|e| self.reject(id, e.into()))?;

        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        if decision == CancellationDecision::Reject && reason.is_none() {
            return Err(self.reject(id, WorkflowError::MissingRejectionReason));
        }

        let guard = self.begin(id)?;
        let result = if order.is_cod() {
            self.api.handle_cod_cancellation(id, decision, reason).await
        } else {
            self.api.handle_cancellation(id, decision, reason).await
        };
        drop(guard);

        let (done, failed) = match decision {
            CancellationDecision::Approve => ("Cancellation approved", "Failed to approve cancellation"),
            CancellationDecision::Reject => ("Cancellation rejected", "Failed to reject cancellation"),
        };

        match result {
            Ok(response) => {
                info!(order_id = %id, %decision, cod = order.is_cod(), "Cancellation decided");
                let reason = reason.map(str::to_string);
                self.succeed(id, &response, done, |o| {
                    o.cancellation_status = next;
                    o.cancellation_requested = false;
                    match decision {
                        CancellationDecision::Approve => {
                            o.order_status = OrderStatus::Cancelled;
                            if o.refund_status.is_none() && o.payment_collected() {
                                o.refund_status = Some(RefundStatus::Pending);
                            }
                        }
                        CancellationDecision::Reject => {
                            o.cancellation_rejection_reason = reason;
                        }
                    }
                });
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(self.fail(id, e, failed)),
        }
    }

    /// Issue (or retry) the refund for an approved cancellation.
    ///
    /// Online orders are refunded in full by the backend; COD orders get
    /// their upfront amount back. Returns the refund status afterwards.
    ///
    /// # Errors
    ///
    /// `NotAvailable`, a refund `Transition` error, `Busy` or a backend
    /// failure.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn process_refund(&self, id: &OrderId) -> Result<RefundStatus, WorkflowError> {
        let order = self.require(id)?;
        let plan = RefundPlan::for_order(&order).map_err(|e| self.reject(id, e))?;
        if order.revenue_status == RevenueStatus::Confirmed {
            warn!(order_id = %id, "Refunding an order whose revenue was already confirmed");
        }

        let guard = self.begin(id)?;
        let result = match plan {
            RefundPlan::Full { .. } => self.api.process_refund(id).await,
            RefundPlan::CodUpfront { amount } => self.api.process_cod_refund(id, amount).await,
        };
        drop(guard);

        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(self.fail(id, e, "Failed to process refund")),
        };

        let data = response.data.clone().unwrap_or_default();
        let outcome = match data.refund_status {
            Some(RefundStatus::Completed) => RefundOutcome::Succeeded,
            Some(RefundStatus::Failed) => RefundOutcome::Failed,
            Some(RefundStatus::Pending | RefundStatus::Processing) => RefundOutcome::Pending,
            None if data.order.is_some() => RefundOutcome::Pending,
            None => RefundOutcome::Succeeded,
        };
        let settled = RefundStatus::Processing.settle(outcome)?;
        let status = data
            .order
            .as_ref()
            .and_then(|o| o.refund_status)
            .unwrap_or(settled);

        if status == RefundStatus::Failed {
            let reason = data
                .refund_failed_reason
                .clone()
                .or_else(|| response.message.clone())
                .unwrap_or_else(|| "Refund failed".to_string());
            warn!(order_id = %id, %reason, "Refund failed");
            let mut state = self.state();
            if let Some(o) = state.orders.iter_mut().find(|o| &o.id == id) {
                o.refund_status = Some(RefundStatus::Failed);
                o.refund_failed_reason = Some(reason.clone());
            }
            state.notices.error(reason, Instant::now());
        } else {
            info!(order_id = %id, amount = %plan.amount(), cod = plan.is_cod(), %status, "Refund processed");
            let message = if plan.is_cod() {
                "COD refund processed"
            } else {
                "Refund processed"
            };
            self.succeed(id, &response, message, |o| {
                o.refund_status = Some(status);
                o.refund_amount = Some(data.refund_amount.unwrap_or_else(|| plan.amount()));
                o.refund_transaction_id.clone_from(&data.refund_transaction_id);
                o.refund_failed_reason = None;
            });
        }

        self.reload().await;
        Ok(status)
    }

    /// Confirm the cash received for a delivered COD order. `amount`
    /// defaults to [`suggested_cod_amount`].
    ///
    /// # Errors
    ///
    /// `NotAvailable`, a revenue `Transition` error, `InvalidAmount`, `Busy`
    /// or a backend failure.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn confirm_cod_payment(
        &self,
        id: &OrderId,
        amount: Option<Price>,
    ) -> Result<Price, WorkflowError> {
        let order = self.require(id)?;
        if !order.is_cod() {
            return Err(self.reject(
                id,
                WorkflowError::NotAvailable("Only COD orders need payment confirmation".to_string()),
            ));
        }
        let next = order
            .revenue_status
            .confirm()
            .map_err(|e| self.reject(id, e.into()))?;
        if order.order_status != OrderStatus::Delivered {
            return Err(self.reject(
                id,
                WorkflowError::NotAvailable("COD payment can be confirmed after delivery".to_string()),
            ));
        }
        let amount = amount.unwrap_or_else(|| suggested_cod_amount(&order));
        if !amount.is_positive() {
            return Err(self.reject(id, WorkflowError::InvalidAmount));
        }

        let guard = self.begin(id)?;
        let result = self.api.confirm_cod_payment(id, amount).await;
        drop(guard);

        match result {
            Ok(response) => {
                info!(order_id = %id, %amount, "COD payment confirmed");
                self.succeed(id, &response, "COD payment confirmed", |o| {
                    o.revenue_status = next;
                    o.revenue_amount = Some(amount);
                    o.payment_status = PaymentStatus::Completed;
                    o.remaining_amount = Some(Price::ZERO);
                });
                self.reload().await;
                Ok(amount)
            }
            Err(e) => Err(self.fail(id, e, "Failed to confirm COD payment")),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require(&self, id: &OrderId) -> Result<Order, WorkflowError> {
        self.order(id)
            .ok_or_else(|| self.reject(id, WorkflowError::UnknownOrder(id.clone())))
    }

    fn begin(&self, id: &OrderId) -> Result<InFlightGuard<OrderId>, WorkflowError> {
        self.in_flight.try_begin(id.clone()).ok_or_else(|| {
            warn!(order_id = %id, "Action already in progress");
            WorkflowError::Busy(id.clone())
        })
    }

    /// Post a local rejection and hand the error back.
    fn reject(&self, id: &OrderId, err: WorkflowError) -> WorkflowError {
        warn!(order_id = %id, error = %err, "Order action rejected");
        self.state().notices.error(err.to_string(), Instant::now());
        err
    }

    fn fail(&self, id: &OrderId, err: ApiError, fallback: &str) -> WorkflowError {
        error!(order_id = %id, error = %err, "Order action failed");
        self.state()
            .notices
            .error(err.user_message(fallback), Instant::now());
        err.into()
    }

    /// Post the success notice and update the local record, preferring the
    /// order echoed by the backend.
    fn succeed(
        &self,
        id: &OrderId,
        response: &ApiResponse<OrderActionData>,
        default_message: &str,
        patch: impl FnOnce(&mut Order),
    ) {
        let mut state = self.state();
        let echoed = response.data.as_ref().and_then(|d| d.order.clone());
        if let Some(slot) = state.orders.iter_mut().find(|o| &o.id == id) {
            match echoed {
                Some(order) => *slot = order,
                None => patch(slot),
            }
        }
        state
            .notices
            .success(response.message_or(default_message), Instant::now());
    }

    /// Re-fetch after a mutation; the local patch stays on failure.
    async fn reload(&self) {
        match self.api.list_orders().await {
            Ok(response) => {
                if let Some(payload) = response.data {
                    self.state().orders = payload.orders;
                }
            }
            Err(e) => warn!(error = %e, "Failed to refresh orders after update"),
        }
    }
}
