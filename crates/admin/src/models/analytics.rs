//! Read-only aggregates behind the dashboard panels.
//!
//! Every field defaults so a partial payload still renders.

use serde::{Deserialize, Serialize};
use shop_console_core::{PaymentMethod, Price};

/// Product counts per shop section (`GET /api/shop/section-counts`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductCounts {
    pub total: u64,
    pub best_sellers: u64,
    pub featured: u64,
    pub most_loved: u64,
    pub loved_items: u64,
    pub in_stock: u64,
    pub out_of_stock: u64,
}

/// Customer and order totals (`GET /api/admin/users/stats`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total_users: u64,
    pub active_users: u64,
    pub blocked_users: u64,
    pub google_users: u64,
    pub new_users_this_month: u64,
    pub total_orders: u64,
}

/// One bucket of the sales time series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesPoint {
    #[serde(alias = "_id")]
    pub date: String,
    pub sales: Price,
    pub orders: u64,
}

/// Best-selling product in the period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopProduct {
    pub name: String,
    pub quantity: u64,
    pub revenue: Price,
}

/// Sales for the selected period (`GET /api/orders/analytics/sales`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesAnalytics {
    pub period: String,
    pub total_sales: Price,
    pub total_orders: u64,
    pub average_order_value: Price,
    pub series: Vec<SalesPoint>,
    pub top_products: Vec<TopProduct>,
}

/// A product running low.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockItem {
    pub name: String,
    pub stock: i64,
}

/// Stock levels (`GET /api/orders/analytics/stock`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockSummary {
    pub total_products: u64,
    pub in_stock: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
    pub low_stock_items: Vec<StockItem>,
}

/// Revenue for one payment method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentMethodRevenue {
    pub method: PaymentMethod,
    pub orders: u64,
    pub earned: Price,
    pub confirmed: Price,
    pub refunded: Price,
}

/// Revenue bookkeeping for the selected period (`GET /api/orders/analytics/revenue`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueAnalytics {
    pub period: String,
    pub total_revenue: Price,
    pub earned_revenue: Price,
    pub confirmed_revenue: Price,
    pub pending_revenue: Price,
    pub refunded_amount: Price,
    pub by_payment_method: Vec<PaymentMethodRevenue>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_partial_payloads_default() {
        let revenue: RevenueAnalytics = serde_json::from_value(json!({
            "totalRevenue": 12000,
            "byPaymentMethod": [{ "method": "cod", "earned": 4000 }]
        }))
        .unwrap();
        assert_eq!(revenue.total_revenue, Price::from_units(12000));
        assert_eq!(revenue.refunded_amount, Price::ZERO);
        assert_eq!(revenue.by_payment_method[0].method, PaymentMethod::Cod);

        let stock: StockSummary = serde_json::from_value(json!({})).unwrap();
        assert_eq!(stock, StockSummary::default());
    }

    #[test]
    fn test_sales_series_accepts_mongo_group_ids() {
        let sales: SalesAnalytics = serde_json::from_value(json!({
            "series": [{ "_id": "2024-05-01", "sales": 999.5, "orders": 3 }]
        }))
        .unwrap();
        assert_eq!(sales.series[0].date, "2024-05-01");
        assert_eq!(sales.series[0].sales.to_string(), "999.50");
    }
}
