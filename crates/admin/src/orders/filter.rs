//! Order list filtering.
//!
//! Filters are pure: they borrow the full list and return the matching
//! records in their original order without touching the source.

use std::collections::BTreeSet;

use shop_console_core::{CancellationStatus, OrderStatus};

use crate::models::Order;

/// Cancellation dropdown values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CancellationBucket {
    #[default]
    All,
    NoCancellation,
    CancellationRequested,
    Cancelled,
    CancellationRejected,
}

impl CancellationBucket {
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::NoCancellation,
        Self::CancellationRequested,
        Self::Cancelled,
        Self::CancellationRejected,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::NoCancellation => "no_cancellation",
            Self::CancellationRequested => "cancellation_requested",
            Self::Cancelled => "cancelled",
            Self::CancellationRejected => "cancellation_rejected",
        }
    }

    /// The bucket `order` falls into (never `All`).
    #[must_use]
    pub fn of(order: &Order) -> Self {
        if order.has_pending_cancellation() {
            return Self::CancellationRequested;
        }
        match order.cancellation_status {
            CancellationStatus::Approved => Self::Cancelled,
            CancellationStatus::Rejected => Self::CancellationRejected,
            CancellationStatus::None | CancellationStatus::Requested => Self::NoCancellation,
        }
    }

    #[must_use]
    pub fn matches(self, order: &Order) -> bool {
        self == Self::All || Self::of(order) == self
    }
}

impl std::str::FromStr for CancellationBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("invalid cancellation filter: {s}"))
    }
}

/// Current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Delivery states to keep; empty keeps every state.
    pub statuses: BTreeSet<OrderStatus>,
    pub cancellation: CancellationBucket,
    /// Case-insensitive match on id, customer name, email or phone.
    pub search: Option<String>,
}

impl OrderFilter {
    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = OrderStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn with_cancellation(mut self, bucket: CancellationBucket) -> Self {
        self.cancellation = bucket;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    /// Whether every order passes.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.statuses.is_empty() && self.cancellation == CancellationBucket::All && self.search.is_none()
    }

    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&order.order_status))
            && self.cancellation.matches(order)
            && self.search.as_deref().is_none_or(|needle| search_matches(order, needle))
    }

    /// Orders passing the filter, in input order.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

fn search_matches(order: &Order, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    [
        order.id.as_str(),
        order.customer_name.as_str(),
        order.customer_email.as_str(),
        order.customer_phone.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use shop_console_core::Price;

    use super::*;

    fn order(id: &str, status: OrderStatus, cancellation: CancellationStatus) -> Order {
        let mut o = Order::new(id, Price::from_units(100));
        o.order_status = status;
        o.cancellation_status = cancellation;
        o.customer_name = format!("Customer {id}");
        o
    }

    fn sample() -> Vec<Order> {
        vec![
            order("a1", OrderStatus::Processing, CancellationStatus::None),
            order("b2", OrderStatus::Shipped, CancellationStatus::Requested),
            order("c3", OrderStatus::Cancelled, CancellationStatus::Approved),
            order("d4", OrderStatus::Delivered, CancellationStatus::Rejected),
            order("e5", OrderStatus::Shipped, CancellationStatus::None),
        ]
    }

    fn ids(orders: &[&Order]) -> Vec<String> {
        orders.iter().map(|o| o.id.to_string()).collect()
    }

    #[test]
    fn test_all_filter_returns_input() {
        let orders = sample();
        let filter = OrderFilter::default();
        assert!(filter.is_all());
        let out = filter.apply(&orders);
        assert_eq!(out.len(), orders.len());
        assert!(out.iter().zip(&orders).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn test_status_multi_select_preserves_order() {
        let orders = sample();
        let filter = OrderFilter::default()
            .with_statuses([OrderStatus::Shipped, OrderStatus::Processing]);
        assert_eq!(ids(&filter.apply(&orders)), ["a1", "b2", "e5"]);
    }

    #[test]
    fn test_cancellation_buckets() {
        let orders = sample();
        let pick = |b| ids(&OrderFilter::default().with_cancellation(b).apply(&orders));
        assert_eq!(pick(CancellationBucket::NoCancellation), ["a1", "e5"]);
        assert_eq!(pick(CancellationBucket::CancellationRequested), ["b2"]);
        assert_eq!(pick(CancellationBucket::Cancelled), ["c3"]);
        assert_eq!(pick(CancellationBucket::CancellationRejected), ["d4"]);
    }

    #[test]
    fn test_legacy_requested_flag_counts_as_request() {
        let mut o = order("f6", OrderStatus::Processing, CancellationStatus::None);
        o.cancellation_requested = true;
        assert_eq!(CancellationBucket::of(&o), CancellationBucket::CancellationRequested);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let orders = sample();
        let filter = OrderFilter::default()
            .with_statuses([OrderStatus::Shipped])
            .with_cancellation(CancellationBucket::NoCancellation);
        let once: Vec<Order> = filter.apply(&orders).into_iter().cloned().collect();
        let twice: Vec<Order> = filter.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(orders.len(), 5);
    }

    #[test]
    fn test_search() {
        let orders = sample();
        let filter = OrderFilter::default().with_search("customer C3");
        assert_eq!(ids(&filter.apply(&orders)), ["c3"]);
        assert!(OrderFilter::default().with_search("   ").search.is_none());
    }

    #[test]
    fn test_bucket_parse() {
        assert_eq!(
            "cancellation-requested".parse::<CancellationBucket>(),
            Ok(CancellationBucket::CancellationRequested)
        );
        assert!("maybe".parse::<CancellationBucket>().is_err());
    }
}
