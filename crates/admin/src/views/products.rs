//! Product and loved-item management.

use std::time::Instant;

use shop_console_core::{CategoryId, Price, ProductId};
use tracing::{info, instrument, warn};

use super::{Confirm, report};
use crate::api::{AdminApi, Catalog};
use crate::config::NoticeDurations;
use crate::error::AppError;
use crate::http::MultipartBody;
use crate::media::{MediaFile, MediaKind};
use crate::models::Product;
use crate::notices::{Notice, NoticeBoard};
use crate::validation::{self, MAX_PRODUCT_IMAGES, ValidationError};

/// Raw product form input.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub material: String,
    pub size: String,
    pub color: String,
    pub weight: String,
    pub utility: String,
    pub care: String,
    pub category: Option<CategoryId>,
    pub sub_category: Option<CategoryId>,
    pub price: String,
    pub regular_price: String,
    pub stock: String,
    pub in_stock: bool,
    pub is_best_seller: bool,
    pub is_featured: bool,
    pub is_most_loved: bool,
    pub cod_available: bool,
    /// Already uploaded image URLs to keep.
    pub existing_images: Vec<String>,
    /// Newly selected files.
    pub new_images: Vec<MediaFile>,
}

impl ProductForm {
    /// Prefill for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            material: text(&product.material),
            size: text(&product.size),
            color: text(&product.color),
            weight: text(&product.weight),
            utility: text(&product.utility),
            care: text(&product.care),
            category: product.category.as_ref().map(|c| c.id().clone()),
            sub_category: product.sub_category.as_ref().map(|c| c.id().clone()),
            price: product.price.to_string(),
            regular_price: product.regular_price.to_string(),
            stock: product.stock.to_string(),
            in_stock: product.in_stock,
            is_best_seller: product.is_best_seller,
            is_featured: product.is_featured,
            is_most_loved: product.is_most_loved,
            cod_available: product.cod_available,
            existing_images: product.images.clone(),
            new_images: Vec::new(),
        }
    }

    /// Add a selected file.
    ///
    /// # Errors
    ///
    /// `WrongMediaType` for non-images, `TooManyImages` past the limit.
    pub fn add_image(&mut self, file: MediaFile) -> Result<(), ValidationError> {
        file.ensure_kind(MediaKind::Image)?;
        if self.image_count() >= MAX_PRODUCT_IMAGES {
            return Err(ValidationError::TooManyImages {
                max: MAX_PRODUCT_IMAGES,
            });
        }
        self.new_images.push(file);
        Ok(())
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        self.existing_images.len() + self.new_images.len()
    }

    /// Data URIs for the newly selected images.
    #[must_use]
    pub fn previews(&self) -> Vec<String> {
        self.new_images.iter().map(MediaFile::preview_uri).collect()
    }

    /// Check the form.
    ///
    /// # Errors
    ///
    /// The first failing rule.
    pub fn validate(&self) -> Result<ProductSubmission, ValidationError> {
        let name = validation::required("Product name", &self.name)?;
        let category = self
            .category
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or(ValidationError::Required("Category"))?;
        let price = validation::positive_price("Price", &self.price)?;
        let regular_price = validation::positive_price("Regular price", &self.regular_price)?;
        if price > regular_price {
            return Err(ValidationError::PriceAboveRegular);
        }
        let stock = validation::stock(&self.stock)?;
        if self.image_count() > MAX_PRODUCT_IMAGES {
            return Err(ValidationError::TooManyImages {
                max: MAX_PRODUCT_IMAGES,
            });
        }
        for file in &self.new_images {
            file.ensure_kind(MediaKind::Image)?;
        }

        Ok(ProductSubmission {
            form: self.clone(),
            name: name.to_string(),
            category,
            price,
            regular_price,
            stock,
        })
    }
}

/// A validated product form.
#[derive(Debug, Clone)]
pub struct ProductSubmission {
    form: ProductForm,
    name: String,
    category: CategoryId,
    price: Price,
    regular_price: Price,
    stock: i64,
}

impl ProductSubmission {
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Multipart body: text fields, repeated `existingImages` and one
    /// `images` part per new file.
    #[must_use]
    pub fn into_multipart(self) -> MultipartBody {
        let f = self.form;
        let optional = |v: &str| Some(v.trim().to_string()).filter(|v| !v.is_empty());
        let flag = |b: bool| if b { "true" } else { "false" };

        let mut body = MultipartBody::new()
            .text("name", self.name)
            .text("description", f.description.trim())
            .text_opt("material", optional(&f.material))
            .text_opt("size", optional(&f.size))
            .text_opt("color", optional(&f.color))
            .text_opt("weight", optional(&f.weight))
            .text_opt("utility", optional(&f.utility))
            .text_opt("care", optional(&f.care))
            .text("category", self.category.into_inner())
            .text_opt("subCategory", f.sub_category.map(CategoryId::into_inner))
            .text("price", self.price.to_string())
            .text("regularPrice", self.regular_price.to_string())
            .text("stock", self.stock.to_string())
            .text("inStock", flag(f.in_stock))
            .text("isBestSeller", flag(f.is_best_seller))
            .text("isFeatured", flag(f.is_featured))
            .text("isMostLoved", flag(f.is_most_loved))
            .text("codAvailable", flag(f.cod_available));
        for url in f.existing_images {
            body = body.text("existingImages", url);
        }
        for file in f.new_images {
            body = body.file("images", file);
        }
        body
    }
}

/// Product list for one catalog.
#[derive(Debug)]
pub struct ProductsView {
    api: AdminApi,
    catalog: Catalog,
    products: Vec<Product>,
    notices: NoticeBoard,
}

impl ProductsView {
    #[must_use]
    pub fn new(api: AdminApi, catalog: Catalog, notices: NoticeDurations) -> Self {
        Self {
            api,
            catalog,
            products: Vec::new(),
            notices: NoticeBoard::new(notices),
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> Catalog {
        self.catalog
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn notices(&mut self, now: Instant) -> &[Notice] {
        self.notices.visible(now)
    }

    #[must_use]
    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.latest()
    }

    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails.
    #[instrument(skip(self), fields(catalog = ?self.catalog))]
    pub async fn load(&mut self) -> Result<(), AppError> {
        match self.api.list_products(self.catalog).await {
            Ok(response) => {
                self.products = response.data_or_default().products;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to load products")),
        }
    }

    /// Re-fetch after a successful write. The write stands even if this
    /// fails; the stale list is kept.
    async fn reload(&mut self) {
        match self.api.list_products(self.catalog).await {
            Ok(response) => self.products = response.data_or_default().products,
            Err(e) => warn!(error = %e, "Failed to refresh products after update"),
        }
    }

    /// # Errors
    ///
    /// Validation or backend failure.
    #[instrument(skip(self, form), fields(catalog = ?self.catalog))]
    pub async fn create(&mut self, form: &ProductForm) -> Result<(), AppError> {
        let submission = form
            .validate()
            .map_err(|e| report(&mut self.notices, e, "Failed to create product"))?;
        match self
            .api
            .create_product(self.catalog, submission.into_multipart())
            .await
        {
            Ok(response) => {
                info!(catalog = ?self.catalog, "Product created");
                let message = response.message_or(&format!("{} created", self.catalog.label()));
                self.notices.success(message, Instant::now());
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to create product")),
        }
    }

    /// # Errors
    ///
    /// Validation or backend failure.
    #[instrument(skip(self, form), fields(product_id = %id))]
    pub async fn update(&mut self, id: &ProductId, form: &ProductForm) -> Result<(), AppError> {
        let submission = form
            .validate()
            .map_err(|e| report(&mut self.notices, e, "Failed to update product"))?;
        match self
            .api
            .update_product(self.catalog, id, submission.into_multipart())
            .await
        {
            Ok(response) => {
                info!(product_id = %id, "Product updated");
                let message = response.message_or(&format!("{} updated", self.catalog.label()));
                self.notices.success(message, Instant::now());
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to update product")),
        }
    }

    /// Delete after confirmation. `Ok(false)` when declined.
    ///
    /// # Errors
    ///
    /// Backend failure.
    #[instrument(skip(self, confirm), fields(product_id = %id))]
    pub async fn delete(&mut self, id: &ProductId, confirm: &dyn Confirm) -> Result<bool, AppError> {
        let name = self.product(id).map_or_else(|| id.to_string(), |p| p.name.clone());
        if !confirm.confirm(&format!("Delete \"{name}\"? This cannot be undone.")) {
            return Ok(false);
        }
        match self.api.delete_product(self.catalog, id).await {
            Ok(response) => {
                info!(product_id = %id, "Product deleted");
                let message = response.message_or(&format!("{} deleted", self.catalog.label()));
                self.notices.success(message, Instant::now());
                self.reload().await;
                Ok(true)
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to delete product")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            name: "Brass Lamp".to_string(),
            category: Some(CategoryId::new("c1")),
            price: "450".to_string(),
            regular_price: "600".to_string(),
            stock: "5".to_string(),
            in_stock: true,
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let submission = valid_form().validate().unwrap();
        assert_eq!(submission.price(), Price::from_units(450));
    }

    #[test]
    fn test_price_above_regular_rejected() {
        let form = ProductForm {
            price: "500".to_string(),
            regular_price: "300".to_string(),
            ..valid_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, ValidationError::PriceAboveRegular);
        assert_eq!(err.to_string(), "Price cannot be greater than regular price");
    }

    #[test]
    fn test_required_fields() {
        let form = ProductForm {
            name: " ".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::Required("Product name"));

        let form = ProductForm {
            category: None,
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::Required("Category"));

        let form = ProductForm {
            regular_price: String::new(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::Required("Regular price"));
    }

    #[test]
    fn test_negative_stock_rejected() {
        let form = ProductForm {
            stock: "-2".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::NegativeStock);
    }

    #[test]
    fn test_image_limits() {
        let mut form = valid_form();
        form.existing_images = vec!["/a.jpg".to_string(), "/b.jpg".to_string(), "/c.jpg".to_string()];
        form.add_image(MediaFile::new("d.png", "image/png", vec![1])).unwrap();
        assert_eq!(
            form.add_image(MediaFile::new("e.png", "image/png", vec![1])),
            Err(ValidationError::TooManyImages { max: 4 })
        );
        assert!(matches!(
            form.add_image(MediaFile::new("clip.mp4", "video/mp4", vec![1])),
            Err(ValidationError::WrongMediaType { .. })
        ));
        assert_eq!(form.previews(), vec!["data:image/png;base64,AQ==".to_string()]);

        form.new_images.push(MediaFile::new("f.png", "image/png", vec![1]));
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::TooManyImages { max: 4 }
        );
    }

    #[test]
    fn test_multipart_fields() {
        let mut form = valid_form();
        form.existing_images = vec!["/keep.jpg".to_string()];
        form.new_images = vec![MediaFile::new("n.png", "image/png", vec![1])];
        form.care = "  ".to_string();
        let body = form.validate().unwrap().into_multipart();
        assert_eq!(body.text_values("price"), vec!["450.00"]);
        assert_eq!(body.text_values("regularPrice"), vec!["600.00"]);
        assert_eq!(body.text_values("existingImages"), vec!["/keep.jpg"]);
        assert_eq!(body.text_values("inStock"), vec!["true"]);
        assert!(body.text_values("care").is_empty());
        assert_eq!(body.file_count("images"), 1);
    }

    #[test]
    fn test_edit_prefill_roundtrips_validation() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": "Mug",
            "category": { "_id": "c1", "name": "Kitchen" },
            "price": 199,
            "regularPrice": 249,
            "stock": 10,
            "images": ["/m.jpg"]
        }))
        .unwrap();
        let form = ProductForm::from_product(&product);
        assert_eq!(form.category, Some(CategoryId::new("c1")));
        assert!(form.validate().is_ok());
    }
}
