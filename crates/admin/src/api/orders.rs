//! Order lifecycle endpoints.

use serde::{Deserialize, Serialize};
use shop_console_core::{CancellationDecision, OrderId, OrderStatus, Price, RefundStatus};
use tracing::instrument;

use super::{AdminApi, ApiResponse};
use crate::http::ApiError;
use crate::models::Order;

/// `data` of `GET /api/orders/json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrdersPayload {
    pub orders: Vec<Order>,
}

/// `data` of every order mutation.
///
/// The backend echoes the updated order; refund endpoints add the refund
/// outcome next to it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderActionData {
    pub order: Option<Order>,
    pub refund_status: Option<RefundStatus>,
    pub refund_amount: Option<Price>,
    pub refund_transaction_id: Option<String>,
    pub refund_failed_reason: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    order_status: OrderStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancellationBody<'a> {
    action: CancellationDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<&'a str>,
}

#[derive(Serialize)]
struct AmountBody {
    amount: Price,
}

#[derive(Serialize)]
struct EmptyBody {}

fn order_path(id: &OrderId, action: &str) -> String {
    format!("/api/orders/{id}/{action}")
}

impl AdminApi {
    /// All orders, newest first as sent by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<ApiResponse<OrdersPayload>, ApiError> {
        self.http.get("/api/orders/json").await
    }

    /// Set the fulfillment status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<ApiResponse<OrderActionData>, ApiError> {
        self.http
            .put_json(&order_path(id, "status"), &StatusBody { order_status: status })
            .await
    }

    /// Decide a cancellation request on an online-paid order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn handle_cancellation(
        &self,
        id: &OrderId,
        action: CancellationDecision,
        rejection_reason: Option<&str>,
    ) -> Result<ApiResponse<OrderActionData>, ApiError> {
        let body = CancellationBody {
            action,
            rejection_reason,
        };
        self.http
            .put_json(&order_path(id, "handle-cancellation"), &body)
            .await
    }

    /// Decide a cancellation request on a COD order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn handle_cod_cancellation(
        &self,
        id: &OrderId,
        action: CancellationDecision,
        rejection_reason: Option<&str>,
    ) -> Result<ApiResponse<OrderActionData>, ApiError> {
        let body = CancellationBody {
            action,
            rejection_reason,
        };
        self.http
            .put_json(&order_path(id, "approve-cod-cancellation"), &body)
            .await
    }

    /// Refund an online-paid order in full. The backend computes the amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn process_refund(
        &self,
        id: &OrderId,
    ) -> Result<ApiResponse<OrderActionData>, ApiError> {
        self.http
            .post_json(&order_path(id, "process-refund"), &EmptyBody {})
            .await
    }

    /// Refund the upfront part of a COD order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, amount), fields(order_id = %id, %amount))]
    pub async fn process_cod_refund(
        &self,
        id: &OrderId,
        amount: Price,
    ) -> Result<ApiResponse<OrderActionData>, ApiError> {
        self.http
            .post_json(&order_path(id, "refund"), &AmountBody { amount })
            .await
    }

    /// Record the cash received for a delivered COD order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, amount), fields(order_id = %id, %amount))]
    pub async fn confirm_cod_payment(
        &self,
        id: &OrderId,
        amount: Price,
    ) -> Result<ApiResponse<OrderActionData>, ApiError> {
        self.http
            .post_json(&order_path(id, "confirm-cod"), &AmountBody { amount })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_bodies() {
        let reject = CancellationBody {
            action: CancellationDecision::Reject,
            rejection_reason: Some("Already shipped"),
        };
        assert_eq!(
            serde_json::to_value(&reject).unwrap(),
            json!({ "action": "reject", "rejectionReason": "Already shipped" })
        );

        let approve = CancellationBody {
            action: CancellationDecision::Approve,
            rejection_reason: None,
        };
        assert_eq!(serde_json::to_value(&approve).unwrap(), json!({ "action": "approve" }));

        let status = StatusBody {
            order_status: OrderStatus::Manufacturing,
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({ "orderStatus": "manufacturing" })
        );

        let amount = AmountBody {
            amount: Price::from_units(150),
        };
        assert_eq!(serde_json::to_value(&amount).unwrap(), json!({ "amount": 150.0 }));
    }

    #[test]
    fn test_order_path() {
        assert_eq!(
            order_path(&OrderId::new("abc"), "confirm-cod"),
            "/api/orders/abc/confirm-cod"
        );
    }

    #[test]
    fn test_action_data_with_refund_fields() {
        let data: OrderActionData = serde_json::from_value(json!({
            "refundStatus": "processing",
            "refundTransactionId": "rfnd_1"
        }))
        .unwrap();
        assert!(data.order.is_none());
        assert_eq!(data.refund_status, Some(RefundStatus::Processing));
    }
}
