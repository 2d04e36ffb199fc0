//! Dashboard panels.
//!
//! Five independent read-only queries. [`Dashboard::refresh`] issues them
//! together and keeps whatever succeeds; a failed panel is logged, listed in
//! [`DashboardSnapshot::failed`] and left empty.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use shop_console_core::{PaymentMethod, Price};
use tracing::{info, instrument, warn};

use crate::api::{AdminApi, ApiResponse, Period};
use crate::http::ApiError;
use crate::models::{
    PaymentMethodRevenue, ProductCounts, RevenueAnalytics, SalesAnalytics, StockSummary, UserStats,
};

/// A dashboard panel, one per backend query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    ProductCounts,
    UserStats,
    Sales,
    Stock,
    Revenue,
}

impl Panel {
    pub const ALL: [Self; 5] = [
        Self::ProductCounts,
        Self::UserStats,
        Self::Sales,
        Self::Stock,
        Self::Revenue,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProductCounts => "product counts",
            Self::UserStats => "user stats",
            Self::Sales => "sales",
            Self::Stock => "stock",
            Self::Revenue => "revenue",
        }
    }

    /// Whether the panel follows the selected period.
    #[must_use]
    pub const fn is_periodic(self) -> bool {
        matches!(self, Self::Sales | Self::Revenue)
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub period: Period,
    pub product_counts: Option<ProductCounts>,
    pub user_stats: Option<UserStats>,
    pub sales: Option<SalesAnalytics>,
    pub stock: Option<StockSummary>,
    pub revenue: Option<RevenueAnalytics>,
    /// Panels whose last fetch failed.
    pub failed: Vec<Panel>,
    /// Fetch batches still running; `refresh` and `set_period` may overlap.
    pub batches_in_flight: usize,
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    /// Whether any fetch batch is still running.
    #[must_use]
    pub const fn is_refreshing(&self) -> bool {
        self.batches_in_flight > 0
    }

    fn finish_batch(&mut self) {
        self.batches_in_flight = self.batches_in_flight.saturating_sub(1);
    }

    #[must_use]
    pub fn has_failed(&self, panel: Panel) -> bool {
        self.failed.contains(&panel)
    }

    /// Per-payment-method revenue with totals, or `None` before revenue loads.
    #[must_use]
    pub fn revenue_breakdown(&self) -> Option<RevenueBreakdown> {
        self.revenue.as_ref().map(RevenueBreakdown::from_analytics)
    }
}

/// Earned vs. confirmed vs. refunded revenue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueBreakdown {
    pub rows: Vec<PaymentMethodRevenue>,
    pub earned: Price,
    pub confirmed: Price,
    pub refunded: Price,
}

impl RevenueBreakdown {
    fn from_analytics(revenue: &RevenueAnalytics) -> Self {
        let rows = revenue.by_payment_method.clone();
        Self {
            earned: rows.iter().map(|r| r.earned).sum(),
            confirmed: rows.iter().map(|r| r.confirmed).sum(),
            refunded: rows.iter().map(|r| r.refunded).sum(),
            rows,
        }
    }

    /// Earned but not yet confirmed.
    #[must_use]
    pub fn unconfirmed(&self) -> Price {
        self.earned.saturating_sub(self.confirmed)
    }

    #[must_use]
    pub fn row(&self, method: PaymentMethod) -> Option<&PaymentMethodRevenue> {
        self.rows.iter().find(|r| r.method == method)
    }
}

/// Dashboard state. Shareable; no lock is held across a request.
#[derive(Debug)]
pub struct Dashboard {
    api: AdminApi,
    state: Mutex<DashboardSnapshot>,
}

impl Dashboard {
    #[must_use]
    pub fn new(api: AdminApi, period: Period) -> Self {
        Self {
            api,
            state: Mutex::new(DashboardSnapshot {
                period,
                ..DashboardSnapshot::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DashboardSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state().clone()
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.state().period
    }

    /// Fetch every panel. Returns the panels that failed.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Vec<Panel> {
        let period = self.begin();
        let (counts, users, sales, stock, revenue) = tokio::join!(
            self.api.product_counts(),
            self.api.user_stats(),
            self.api.sales_analytics(period),
            self.api.stock_analytics(),
            self.api.revenue_analytics(period),
        );

        let mut guard = self.state();
        let state = &mut *guard;
        state.product_counts = settle(Panel::ProductCounts, counts, &mut state.failed);
        state.user_stats = settle(Panel::UserStats, users, &mut state.failed);
        state.stock = settle(Panel::Stock, stock, &mut state.failed);
        apply_periodic(state, period, sales, revenue);
        state.finish_batch();
        state.last_refreshed = Some(Utc::now());
        info!(failed = state.failed.len(), "Dashboard refreshed");
        state.failed.clone()
    }

    /// Select a new period and re-fetch the period-dependent panels.
    #[instrument(skip(self))]
    pub async fn set_period(&self, period: Period) -> Vec<Panel> {
        {
            let mut state = self.state();
            state.period = period;
            state.batches_in_flight += 1;
        }
        let (sales, revenue) = tokio::join!(
            self.api.sales_analytics(period),
            self.api.revenue_analytics(period),
        );

        let mut state = self.state();
        apply_periodic(&mut *state, period, sales, revenue);
        state.finish_batch();
        state.failed.clone()
    }

    fn begin(&self) -> Period {
        let mut state = self.state();
        state.batches_in_flight += 1;
        state.period
    }
}

/// Store period results unless the period changed while they were in flight.
fn apply_periodic(
    state: &mut DashboardSnapshot,
    period: Period,
    sales: Result<ApiResponse<SalesAnalytics>, ApiError>,
    revenue: Result<ApiResponse<RevenueAnalytics>, ApiError>,
) {
    if state.period != period {
        warn!(%period, current = %state.period, "Discarding analytics for a stale period");
        return;
    }
    state.sales = settle(Panel::Sales, sales, &mut state.failed);
    state.revenue = settle(Panel::Revenue, revenue, &mut state.failed);
}

fn settle<T: Default>(
    panel: Panel,
    result: Result<ApiResponse<T>, ApiError>,
    failed: &mut Vec<Panel>,
) -> Option<T> {
    failed.retain(|p| *p != panel);
    match result {
        Ok(response) => Some(response.data_or_default()),
        Err(e) => {
            warn!(%panel, error = %e, "Dashboard panel failed to load");
            failed.push(panel);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::config::ConsoleConfig;
    use crate::navigation::RouteTracker;
    use crate::session::Session;

    fn revenue() -> RevenueAnalytics {
        serde_json::from_value(json!({
            "period": "30d",
            "byPaymentMethod": [
                { "method": "online", "orders": 3, "earned": 300, "confirmed": 300, "refunded": 50 },
                { "method": "cod", "orders": 2, "earned": 200, "confirmed": 80, "refunded": 0 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_revenue_breakdown_totals() {
        let snapshot = DashboardSnapshot {
            revenue: Some(revenue()),
            ..DashboardSnapshot::default()
        };
        let breakdown = snapshot.revenue_breakdown().unwrap();
        assert_eq!(breakdown.earned, Price::from_units(500));
        assert_eq!(breakdown.confirmed, Price::from_units(380));
        assert_eq!(breakdown.refunded, Price::from_units(50));
        assert_eq!(breakdown.unconfirmed(), Price::from_units(120));
        assert_eq!(
            breakdown.row(PaymentMethod::Cod).map(|r| r.orders),
            Some(2)
        );
    }

    #[test]
    fn test_no_breakdown_before_load() {
        assert!(DashboardSnapshot::default().revenue_breakdown().is_none());
    }

    #[test]
    fn test_settle_tracks_failures() {
        let mut failed = vec![Panel::Stock];
        let ok: Result<ApiResponse<StockSummary>, ApiError> = Ok(ApiResponse {
            success: Some(true),
            message: None,
            data: None,
        });
        assert!(settle(Panel::Stock, ok, &mut failed).is_some());
        assert!(failed.is_empty());

        let err: Result<ApiResponse<StockSummary>, ApiError> = Err(ApiError::Unauthorized);
        assert!(settle(Panel::Stock, err, &mut failed).is_none());
        assert_eq!(failed, vec![Panel::Stock]);
    }

    #[test]
    fn test_stale_period_discarded() {
        let mut snapshot = DashboardSnapshot {
            period: Period::SevenDays,
            ..DashboardSnapshot::default()
        };
        apply_periodic(
            &mut snapshot,
            Period::OneYear,
            Err(ApiError::Unauthorized),
            Err(ApiError::Unauthorized),
        );
        assert!(snapshot.failed.is_empty());
    }

    #[tokio::test]
    async fn test_refreshing_until_every_batch_settles() {
        let config = ConsoleConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        let api = AdminApi::new(&config, Session::in_memory(), Arc::new(RouteTracker::default()))
            .unwrap();
        let dashboard = Dashboard::new(api, Period::ThirtyDays);

        // A refresh batch that has started but not settled.
        let _ = dashboard.begin();
        dashboard.set_period(Period::SevenDays).await;
        assert!(dashboard.snapshot().is_refreshing());

        dashboard.state().finish_batch();
        assert!(!dashboard.snapshot().is_refreshing());
    }
}
