//! Order records as served by `GET /api/orders/json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_console_core::{
    CancellationStatus, OrderId, OrderStatus, PaymentMethod, PaymentStatus, Price,
    RefundStatus, RevenueStatus,
};

/// Shipping destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    #[serde(deserialize_with = "super::null_as_default")]
    pub street: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub pincode: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub country: String,
}

impl std::fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = [
            self.street.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.pincode.as_str(),
            self.country.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
        f.write_str(&parts.join(", "))
    }
}

/// A purchased product line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub price: Price,
    #[serde(deserialize_with = "super::null_as_default")]
    pub quantity: u32,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl LineItem {
    /// `price * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::new(self.price.amount() * rust_decimal::Decimal::from(self.quantity))
    }
}

/// An order with its fulfillment, cancellation, revenue and refund state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,

    // Customer
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub customer_email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub customer_phone: String,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,

    // Contents
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_amount: Price,

    // Fulfillment and payment
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub order_status: OrderStatus,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub upfront_amount: Option<Price>,
    #[serde(default)]
    pub remaining_amount: Option<Price>,

    // Cancellation
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub cancellation_requested: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub cancellation_status: CancellationStatus,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub cancellation_rejection_reason: Option<String>,
    #[serde(default)]
    pub cancellation_requested_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancellation_approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancellation_rejected_at: Option<DateTime<Utc>>,

    // Revenue
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub revenue_status: RevenueStatus,
    #[serde(default)]
    pub revenue_amount: Option<Price>,

    // Refund
    #[serde(default)]
    pub refund_status: Option<RefundStatus>,
    #[serde(default)]
    pub refund_amount: Option<Price>,
    #[serde(default)]
    pub refund_transaction_id: Option<String>,
    #[serde(default)]
    pub refund_failed_reason: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Minimal order, used by tests and as a builder base.
    #[must_use]
    pub fn new(id: impl Into<OrderId>, total_amount: Price) -> Self {
        Self {
            id: id.into(),
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            shipping_address: None,
            items: Vec::new(),
            total_amount,
            order_status: OrderStatus::default(),
            payment_method: PaymentMethod::default(),
            payment_status: PaymentStatus::default(),
            upfront_amount: None,
            remaining_amount: None,
            cancellation_requested: false,
            cancellation_status: CancellationStatus::default(),
            cancellation_reason: None,
            cancellation_rejection_reason: None,
            cancellation_requested_at: None,
            cancellation_approved_at: None,
            cancellation_rejected_at: None,
            revenue_status: RevenueStatus::default(),
            revenue_amount: None,
            refund_status: None,
            refund_amount: None,
            refund_transaction_id: None,
            refund_failed_reason: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Cash-on-delivery order.
    #[must_use]
    pub fn is_cod(&self) -> bool {
        self.payment_method == PaymentMethod::Cod
    }

    /// Upfront part of a COD order, zero when absent.
    #[must_use]
    pub fn upfront(&self) -> Price {
        self.upfront_amount.unwrap_or(Price::ZERO)
    }

    /// Whether any money was collected online and would need refunding.
    #[must_use]
    pub fn payment_collected(&self) -> bool {
        if self.is_cod() {
            self.upfront().is_positive() && self.payment_status != PaymentStatus::PendingUpfront
        } else {
            self.payment_status == PaymentStatus::Completed
        }
    }

    /// Refund state as the workflow sees it.
    ///
    /// Backends omit `refundStatus` until a refund is touched; an approved
    /// cancellation of a paid order counts as `Pending` in that case.
    #[must_use]
    pub fn effective_refund_status(&self) -> Option<RefundStatus> {
        self.refund_status.or_else(|| {
            (self.cancellation_status == CancellationStatus::Approved && self.payment_collected())
                .then_some(RefundStatus::Pending)
        })
    }

    /// Whether the customer has an undecided cancellation request.
    #[must_use]
    pub fn has_pending_cancellation(&self) -> bool {
        self.cancellation_status == CancellationStatus::Requested
            || (self.cancellation_requested && self.cancellation_status == CancellationStatus::None)
    }

    /// Total item count.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_backend_order() {
        let order: Order = serde_json::from_value(json!({
            "_id": "66f1",
            "customerName": "Ravi",
            "items": [{ "name": "Vase", "price": 250, "quantity": 2, "color": "blue" }],
            "totalAmount": 1000,
            "orderStatus": "shipped",
            "paymentMethod": "cod",
            "paymentStatus": "pending_upfront",
            "upfrontAmount": 200,
            "remainingAmount": 800,
            "cancellationStatus": "requested",
            "revenueStatus": "earned",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "someFieldTheConsoleIgnores": true
        }))
        .unwrap();

        assert_eq!(order.id.as_str(), "66f1");
        assert_eq!(order.order_status, OrderStatus::Shipped);
        assert!(order.is_cod());
        assert_eq!(order.upfront(), Price::from_units(200));
        assert_eq!(order.items[0].subtotal(), Price::from_units(500));
        assert_eq!(order.item_count(), 2);
        assert!(order.has_pending_cancellation());
        assert!(order.refund_status.is_none());
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_minimal_order_defaults() {
        let order: Order = serde_json::from_value(json!({ "id": "x" })).unwrap();
        assert_eq!(order.order_status, OrderStatus::Processing);
        assert_eq!(order.cancellation_status, CancellationStatus::None);
        assert_eq!(order.revenue_status, RevenueStatus::Pending);
        assert_eq!(order.total_amount, Price::ZERO);
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let order: Order = serde_json::from_value(json!({
            "_id": "legacy",
            "customerPhone": null,
            "customerEmail": null,
            "orderStatus": null,
            "cancellationRequested": null,
            "items": [{ "name": null, "price": 120, "quantity": 1 }],
            "shippingAddress": { "street": "4 Park St", "state": null }
        }))
        .unwrap();
        assert!(order.customer_phone.is_empty());
        assert_eq!(order.order_status, OrderStatus::Processing);
        assert!(!order.cancellation_requested);
        assert!(order.items[0].name.is_empty());
        assert_eq!(order.shipping_address.unwrap().to_string(), "4 Park St");
    }

    #[test]
    fn test_effective_refund_status() {
        let mut order = Order::new("o1", Price::from_units(1000));
        order.payment_status = PaymentStatus::Completed;
        assert_eq!(order.effective_refund_status(), None);

        order.cancellation_status = CancellationStatus::Approved;
        assert_eq!(order.effective_refund_status(), Some(RefundStatus::Pending));

        order.refund_status = Some(RefundStatus::Failed);
        assert_eq!(order.effective_refund_status(), Some(RefundStatus::Failed));
    }

    #[test]
    fn test_cod_without_upfront_collected_nothing() {
        let mut order = Order::new("o2", Price::from_units(1000));
        order.payment_method = PaymentMethod::Cod;
        order.cancellation_status = CancellationStatus::Approved;
        assert!(!order.payment_collected());
        assert_eq!(order.effective_refund_status(), None);
    }

    #[test]
    fn test_address_display_skips_blanks() {
        let address = ShippingAddress {
            street: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            pincode: "411001".to_string(),
            ..ShippingAddress::default()
        };
        assert_eq!(address.to_string(), "12 MG Road, Pune, 411001");
    }
}
