//! Status enums and their transition rules.
//!
//! An order carries four independent status fields: fulfillment
//! ([`OrderStatus`]), customer cancellation ([`CancellationStatus`]),
//! revenue bookkeeping ([`RevenueStatus`]) and refund progress
//! ([`RefundStatus`]). Each enum owns an exhaustive transition function so
//! invalid moves are rejected in one place with a [`TransitionError`].

use serde::{Deserialize, Serialize};

/// A rejected status transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The order's cancellation was approved; its status is frozen.
    #[error("Cannot update status of cancelled orders")]
    CancelledOrderLocked,
    /// The requested status equals the current one.
    #[error("Order is already {0}")]
    Unchanged(OrderStatus),
    /// A cancellation decision was made without a pending request.
    #[error("No pending cancellation request (current status: {0})")]
    NoPendingCancellation(CancellationStatus),
    /// COD revenue can only be confirmed once it has been earned.
    #[error("Revenue has not been earned yet")]
    RevenueNotEarned,
    /// COD revenue was already confirmed.
    #[error("COD payment has already been confirmed")]
    RevenueAlreadyConfirmed,
    /// A refund is already being processed.
    #[error("Refund is already being processed")]
    RefundInProgress,
    /// The refund has completed.
    #[error("Refund has already been completed")]
    RefundAlreadyCompleted,
    /// A refund outcome arrived for a refund that was not processing.
    #[error("Refund is not being processed (current status: {0})")]
    RefundNotInProgress(RefundStatus),
}

// =============================================================================
// Fulfillment
// =============================================================================

/// Order fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Processing,
    Confirmed,
    Manufacturing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Processing,
        Self::Confirmed,
        Self::Manufacturing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire value (`"processing"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Confirmed => "confirmed",
            Self::Manufacturing => "manufacturing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Validate a direct status selection.
    ///
    /// Any status may be selected (the pipeline is not enforced linearly)
    /// unless the order's cancellation was approved.
    ///
    /// # Errors
    ///
    /// [`TransitionError::CancelledOrderLocked`] for approved cancellations,
    /// [`TransitionError::Unchanged`] when `target` is the current status.
    pub fn transition_to(
        self,
        target: Self,
        cancellation: CancellationStatus,
    ) -> Result<Self, TransitionError> {
        if cancellation.locks_order_status() {
            return Err(TransitionError::CancelledOrderLocked);
        }
        if self == target {
            return Err(TransitionError::Unchanged(self));
        }
        Ok(target)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

// =============================================================================
// Payment
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Online,
    /// Cash on delivery, optionally with an upfront online part.
    Cod,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Cod => write!(f, "cod"),
        }
    }
}

/// Payment collection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    /// COD order whose upfront part has not been paid yet.
    PendingUpfront,
    Completed,
    Failed,
}

// =============================================================================
// Cancellation
// =============================================================================

/// Admin decision on a customer's cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancellationDecision {
    Approve,
    Reject,
}

impl std::fmt::Display for CancellationDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Customer-initiated cancellation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CancellationStatus {
    #[default]
    None,
    Requested,
    Approved,
    Rejected,
}

impl CancellationStatus {
    /// Apply an admin decision. Only a pending request can be decided.
    ///
    /// # Errors
    ///
    /// [`TransitionError::NoPendingCancellation`] unless `self` is `Requested`.
    pub const fn decide(self, decision: CancellationDecision) -> Result<Self, TransitionError> {
        match (self, decision) {
            (Self::Requested, CancellationDecision::Approve) => Ok(Self::Approved),
            (Self::Requested, CancellationDecision::Reject) => Ok(Self::Rejected),
            (Self::None | Self::Approved | Self::Rejected, _) => {
                Err(TransitionError::NoPendingCancellation(self))
            }
        }
    }

    /// Whether fulfillment status changes are frozen.
    #[must_use]
    pub const fn locks_order_status(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl std::fmt::Display for CancellationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Requested => write!(f, "requested"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

// =============================================================================
// Revenue
// =============================================================================

/// Admin-facing revenue bookkeeping state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevenueStatus {
    #[default]
    Pending,
    /// Delivered; cash not yet confirmed as received.
    Earned,
    Confirmed,
}

impl RevenueStatus {
    /// Confirm receipt of COD cash.
    ///
    /// # Errors
    ///
    /// [`TransitionError::RevenueNotEarned`] from `Pending`,
    /// [`TransitionError::RevenueAlreadyConfirmed`] from `Confirmed`.
    pub const fn confirm(self) -> Result<Self, TransitionError> {
        match self {
            Self::Earned => Ok(Self::Confirmed),
            Self::Pending => Err(TransitionError::RevenueNotEarned),
            Self::Confirmed => Err(TransitionError::RevenueAlreadyConfirmed),
        }
    }
}

// =============================================================================
// Refund
// =============================================================================

/// Result reported by the backend for a refund attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundOutcome {
    /// Money was returned.
    Succeeded,
    /// The gateway rejected the refund.
    Failed,
    /// Accepted, settlement pending.
    Pending,
}

/// Refund progress for an approved cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl RefundStatus {
    /// Whether a (re)try of the refund is allowed.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }

    /// Start a refund attempt. `Failed` may be retried.
    ///
    /// # Errors
    ///
    /// [`TransitionError::RefundInProgress`] or
    /// [`TransitionError::RefundAlreadyCompleted`].
    pub const fn begin(self) -> Result<Self, TransitionError> {
        match self {
            Self::Pending | Self::Failed => Ok(Self::Processing),
            Self::Processing => Err(TransitionError::RefundInProgress),
            Self::Completed => Err(TransitionError::RefundAlreadyCompleted),
        }
    }

    /// Record the backend's outcome for a processing refund.
    ///
    /// # Errors
    ///
    /// [`TransitionError::RefundNotInProgress`] unless `self` is `Processing`.
    pub const fn settle(self, outcome: RefundOutcome) -> Result<Self, TransitionError> {
        match (self, outcome) {
            (Self::Processing, RefundOutcome::Succeeded) => Ok(Self::Completed),
            (Self::Processing, RefundOutcome::Failed) => Ok(Self::Failed),
            (Self::Processing, RefundOutcome::Pending) => Ok(Self::Processing),
            (Self::Pending | Self::Completed | Self::Failed, _) => {
                Err(TransitionError::RefundNotInProgress(self))
            }
        }
    }
}

impl std::fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

// =============================================================================
// Announcements
// =============================================================================

/// Visual category of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    #[default]
    Info,
    Warning,
    Success,
    Error,
    Promotion,
}

/// Announcement priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Publication state of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_any_direct_selection_allowed() {
        assert_eq!(
            OrderStatus::Delivered.transition_to(OrderStatus::Processing, CancellationStatus::None),
            Ok(OrderStatus::Processing)
        );
        assert_eq!(
            OrderStatus::Processing.transition_to(OrderStatus::Shipped, CancellationStatus::Rejected),
            Ok(OrderStatus::Shipped)
        );
    }

    #[test]
    fn test_order_status_locked_after_approved_cancellation() {
        for target in OrderStatus::ALL {
            let err = OrderStatus::Cancelled
                .transition_to(target, CancellationStatus::Approved)
                .unwrap_err();
            assert_eq!(err, TransitionError::CancelledOrderLocked);
            assert_eq!(err.to_string(), "Cannot update status of cancelled orders");
        }
    }

    #[test]
    fn test_order_status_unchanged_rejected() {
        assert_eq!(
            OrderStatus::Shipped.transition_to(OrderStatus::Shipped, CancellationStatus::None),
            Err(TransitionError::Unchanged(OrderStatus::Shipped))
        );
    }

    #[test]
    fn test_order_status_wire_format() {
        assert_eq!(serde_json::to_string(&OrderStatus::Manufacturing).unwrap(), "\"manufacturing\"");
        assert_eq!("Delivered".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_cancellation_decisions() {
        use CancellationDecision::{Approve, Reject};

        assert_eq!(CancellationStatus::Requested.decide(Approve), Ok(CancellationStatus::Approved));
        assert_eq!(CancellationStatus::Requested.decide(Reject), Ok(CancellationStatus::Rejected));
        for from in [
            CancellationStatus::None,
            CancellationStatus::Approved,
            CancellationStatus::Rejected,
        ] {
            assert_eq!(
                from.decide(Approve),
                Err(TransitionError::NoPendingCancellation(from))
            );
        }
    }

    #[test]
    fn test_revenue_confirmation() {
        assert_eq!(RevenueStatus::Earned.confirm(), Ok(RevenueStatus::Confirmed));
        assert_eq!(RevenueStatus::Pending.confirm(), Err(TransitionError::RevenueNotEarned));
        assert_eq!(
            RevenueStatus::Confirmed.confirm(),
            Err(TransitionError::RevenueAlreadyConfirmed)
        );
    }

    #[test]
    fn test_refund_lifecycle_with_retry() {
        let processing = RefundStatus::Pending.begin().unwrap();
        let failed = processing.settle(RefundOutcome::Failed).unwrap();
        assert_eq!(failed, RefundStatus::Failed);
        assert!(failed.is_actionable());

        let retried = failed.begin().unwrap();
        assert_eq!(retried.settle(RefundOutcome::Succeeded), Ok(RefundStatus::Completed));
        assert_eq!(
            RefundStatus::Completed.begin(),
            Err(TransitionError::RefundAlreadyCompleted)
        );
        assert_eq!(
            RefundStatus::Processing.begin(),
            Err(TransitionError::RefundInProgress)
        );
        assert_eq!(
            RefundStatus::Pending.settle(RefundOutcome::Succeeded),
            Err(TransitionError::RefundNotInProgress(RefundStatus::Pending))
        );
    }

    #[test]
    fn test_payment_status_wire_format() {
        let s: PaymentStatus = serde_json::from_str("\"pending_upfront\"").unwrap();
        assert_eq!(s, PaymentStatus::PendingUpfront);
    }
}
