//! Dashboard aggregate endpoints.

use tracing::instrument;

use super::{AdminApi, ApiResponse};
use crate::http::ApiError;
use crate::models::{ProductCounts, RevenueAnalytics, SalesAnalytics, StockSummary, UserStats};

/// Reporting window for period-dependent analytics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Period {
    SevenDays,
    #[default]
    ThirtyDays,
    NinetyDays,
    OneYear,
}

impl Period {
    pub const ALL: [Self; 4] = [Self::SevenDays, Self::ThirtyDays, Self::NinetyDays, Self::OneYear];

    /// Query value (`7d`, `30d`, `90d`, `1y`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SevenDays => "7d",
            Self::ThirtyDays => "30d",
            Self::NinetyDays => "90d",
            Self::OneYear => "1y",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid period '{s}', expected one of 7d, 30d, 90d, 1y"))
    }
}

impl AdminApi {
    /// Sales for `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn sales_analytics(
        &self,
        period: Period,
    ) -> Result<ApiResponse<SalesAnalytics>, ApiError> {
        self.http
            .get_query("/api/orders/analytics/sales", &[("period", period.as_str())])
            .await
    }

    /// Revenue bookkeeping for `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn revenue_analytics(
        &self,
        period: Period,
    ) -> Result<ApiResponse<RevenueAnalytics>, ApiError> {
        self.http
            .get_query("/api/orders/analytics/revenue", &[("period", period.as_str())])
            .await
    }

    /// Current stock levels.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn stock_analytics(&self) -> Result<ApiResponse<StockSummary>, ApiError> {
        self.http.get("/api/orders/analytics/stock").await
    }

    /// Product counts per shop section.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn product_counts(&self) -> Result<ApiResponse<ProductCounts>, ApiError> {
        self.http.get("/api/shop/section-counts").await
    }

    /// Customer and order totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn user_stats(&self) -> Result<ApiResponse<UserStats>, ApiError> {
        self.http.get("/api/admin/users/stats").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parse() {
        assert_eq!("1Y".parse::<Period>(), Ok(Period::OneYear));
        assert_eq!(Period::default().as_str(), "30d");
        assert!("2w".parse::<Period>().is_err());
    }
}
