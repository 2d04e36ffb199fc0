//! Products and loved items.
//!
//! Both catalogs expose the same five operations under different roots.

use serde::Deserialize;
use shop_console_core::ProductId;
use tracing::instrument;

use super::{Ack, AdminApi, ApiResponse};
use crate::http::{ApiError, MultipartBody};
use crate::models::Product;

/// Which product collection an operation targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Catalog {
    /// `/api/shop`
    #[default]
    Shop,
    /// `/api/loved`
    Loved,
}

impl Catalog {
    #[must_use]
    pub const fn base_path(self) -> &'static str {
        match self {
            Self::Shop => "/api/shop",
            Self::Loved => "/api/loved",
        }
    }

    /// Singular noun for notices.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shop => "Product",
            Self::Loved => "Loved item",
        }
    }

    fn item_path(self, id: &ProductId) -> String {
        format!("{}/{id}", self.base_path())
    }
}

/// `data` of list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductsPayload {
    #[serde(alias = "items", alias = "lovedItems")]
    pub products: Vec<Product>,
}

/// `data` of single-item endpoints. Writes may omit the echoed record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductPayload {
    #[serde(alias = "item", alias = "lovedItem")]
    pub product: Option<Product>,
}

impl AdminApi {
    /// Every item in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        catalog: Catalog,
    ) -> Result<ApiResponse<ProductsPayload>, ApiError> {
        self.http.get(catalog.base_path()).await
    }

    /// One item.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        catalog: Catalog,
        id: &ProductId,
    ) -> Result<ApiResponse<ProductPayload>, ApiError> {
        self.http.get(&catalog.item_path(id)).await
    }

    /// Create an item from a validated form.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, body))]
    pub async fn create_product(
        &self,
        catalog: Catalog,
        body: MultipartBody,
    ) -> Result<ApiResponse<ProductPayload>, ApiError> {
        self.http.post_multipart(catalog.base_path(), body).await
    }

    /// Replace an item from a validated form.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, body), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        catalog: Catalog,
        id: &ProductId,
        body: MultipartBody,
    ) -> Result<ApiResponse<ProductPayload>, ApiError> {
        self.http.put_multipart(&catalog.item_path(id), body).await
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, catalog: Catalog, id: &ProductId) -> Result<Ack, ApiError> {
        self.http.delete(&catalog.item_path(id)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_paths() {
        let id = ProductId::new("p9");
        assert_eq!(Catalog::Shop.item_path(&id), "/api/shop/p9");
        assert_eq!(Catalog::Loved.item_path(&id), "/api/loved/p9");
    }

    #[test]
    fn test_loved_payload_alias() {
        let payload: ProductsPayload =
            serde_json::from_value(json!({ "lovedItems": [{ "_id": "l1", "name": "Mug" }] }))
                .unwrap();
        assert_eq!(payload.products.len(), 1);
    }

    #[test]
    fn test_write_payload_without_echo() {
        let payload: ProductPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.product.is_none());

        let payload: ProductPayload =
            serde_json::from_value(json!({ "lovedItem": { "_id": "l1", "name": "Mug" } })).unwrap();
        assert_eq!(payload.product.unwrap().name, "Mug");
    }
}
