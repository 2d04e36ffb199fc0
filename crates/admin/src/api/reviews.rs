//! Review moderation endpoints.

use serde::Deserialize;
use shop_console_core::ReviewId;
use tracing::instrument;

use super::{Ack, AdminApi, ApiResponse};
use crate::http::ApiError;
use crate::models::Review;

/// `data` of `GET /api/reviews`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReviewsPayload {
    pub reviews: Vec<Review>,
}

impl AdminApi {
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn list_reviews(&self) -> Result<ApiResponse<ReviewsPayload>, ApiError> {
        self.http.get("/api/reviews").await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(review_id = %id))]
    pub async fn delete_review(&self, id: &ReviewId) -> Result<Ack, ApiError> {
        self.http.delete(&format!("/api/reviews/{id}")).await
    }
}
