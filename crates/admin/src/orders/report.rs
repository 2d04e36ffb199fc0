//! CSV export of the filtered order list.

use std::io::Write;

use csv::Writer;
use thiserror::Error;

use crate::models::Order;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

const HEADER: [&str; 15] = [
    "Order ID",
    "Date",
    "Customer",
    "Email",
    "Phone",
    "Items",
    "Total",
    "Payment Method",
    "Payment Status",
    "Order Status",
    "Cancellation",
    "Revenue Status",
    "Revenue Amount",
    "Refund Status",
    "Refund Amount",
];

/// Write `orders` as CSV with a header row. Returns the number of rows.
///
/// # Errors
///
/// Returns `ReportError` if writing fails.
pub fn write_orders_csv<'a, W: Write>(
    orders: impl IntoIterator<Item = &'a Order>,
    out: W,
) -> Result<usize, ReportError> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(HEADER)?;

    let mut rows = 0;
    for order in orders {
        let items = order
            .items
            .iter()
            .map(|i| format!("{} x{}", i.name, i.quantity))
            .collect::<Vec<_>>()
            .join("; ");
        let date = order
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let refund_status = order
            .effective_refund_status()
            .map(|s| s.to_string())
            .unwrap_or_default();

        wtr.write_record([
            order.id.to_string(),
            date,
            order.customer_name.clone(),
            order.customer_email.clone(),
            order.customer_phone.clone(),
            items,
            order.total_amount.to_string(),
            order.payment_method.to_string(),
            payment_status_label(order).to_string(),
            order.order_status.to_string(),
            order.cancellation_status.to_string(),
            revenue_label(order).to_string(),
            order.revenue_amount.map(|p| p.to_string()).unwrap_or_default(),
            refund_status,
            order.refund_amount.map(|p| p.to_string()).unwrap_or_default(),
        ])?;
        rows += 1;
    }

    wtr.flush()?;
    Ok(rows)
}

const fn payment_status_label(order: &Order) -> &'static str {
    use shop_console_core::PaymentStatus;
    match order.payment_status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::PendingUpfront => "pending_upfront",
        PaymentStatus::Completed => "completed",
        PaymentStatus::Failed => "failed",
    }
}

const fn revenue_label(order: &Order) -> &'static str {
    use shop_console_core::RevenueStatus;
    match order.revenue_status {
        RevenueStatus::Pending => "pending",
        RevenueStatus::Earned => "earned",
        RevenueStatus::Confirmed => "confirmed",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shop_console_core::Price;

    use super::*;
    use crate::models::LineItem;

    #[test]
    fn test_csv_rows_and_quoting() {
        let mut order = Order::new("o1", Price::from_units(1200));
        order.customer_name = "Rao, Anil".to_string();
        order.items = vec![
            LineItem {
                name: "Vase".to_string(),
                price: Price::from_units(400),
                quantity: 2,
                ..LineItem::default()
            },
            LineItem {
                name: "Mat".to_string(),
                price: Price::from_units(400),
                quantity: 1,
                ..LineItem::default()
            },
        ];

        let mut buf = Vec::new();
        let rows = write_orders_csv([&order], &mut buf).unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Order ID,Date,Customer"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("o1,,\"Rao, Anil\""));
        assert!(row.contains("Vase x2; Mat x1"));
        assert!(row.contains("1200.00"));
        assert!(lines.next().is_none());
    }
}
