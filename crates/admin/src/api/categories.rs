//! Category tree endpoints.

use serde::Deserialize;
use shop_console_core::CategoryId;
use tracing::instrument;

use super::{Ack, AdminApi, ApiResponse};
use crate::http::{ApiError, MultipartBody};
use crate::models::Category;

/// `data` of `GET /api/categories`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoriesPayload {
    pub categories: Vec<Category>,
}

/// `data` of category writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryPayload {
    pub category: Option<Category>,
}

impl AdminApi {
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<ApiResponse<CategoriesPayload>, ApiError> {
        self.http.get("/api/categories").await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, body))]
    pub async fn create_category(
        &self,
        body: MultipartBody,
    ) -> Result<ApiResponse<CategoryPayload>, ApiError> {
        self.http.post_multipart("/api/categories", body).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, body), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        body: MultipartBody,
    ) -> Result<ApiResponse<CategoryPayload>, ApiError> {
        self.http
            .put_multipart(&format!("/api/categories/{id}"), body)
            .await
    }

    /// Sub-categories of a deleted main category are left to the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<Ack, ApiError> {
        self.http.delete(&format!("/api/categories/{id}")).await
    }
}
