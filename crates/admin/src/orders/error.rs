//! Order workflow errors.

use shop_console_core::{OrderId, TransitionError};
use thiserror::Error;

use crate::http::ApiError;

/// Why an order action did not complete.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The state machine rejected the move.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Please provide a reason for rejecting the cancellation")]
    MissingRejectionReason,

    /// Another action on the same order is still running.
    #[error("An action is already in progress for order {0}")]
    Busy(OrderId),

    #[error("Order {0} is not loaded")]
    UnknownOrder(OrderId),

    /// The action is not offered for the order's current state.
    #[error("{0}")]
    NotAvailable(String),

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WorkflowError {
    /// Whether the action was stopped before any request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        !matches!(self, Self::Api(_))
    }
}
