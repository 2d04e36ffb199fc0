//! Two-level category tree management.

use std::time::Instant;

use shop_console_core::CategoryId;
use tracing::{info, instrument, warn};

use super::{Confirm, report};
use crate::api::AdminApi;
use crate::config::NoticeDurations;
use crate::error::AppError;
use crate::http::MultipartBody;
use crate::media::{MediaFile, MediaKind};
use crate::models::Category;
use crate::notices::{Notice, NoticeBoard};
use crate::validation::{self, ValidationError};

/// Raw category form input.
#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
    /// Main category this one sits under; `None` for a main category.
    pub parent: Option<CategoryId>,
    pub image: Option<MediaFile>,
    pub video: Option<MediaFile>,
}

impl CategoryForm {
    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            parent: category.parent_category.as_ref().map(|p| p.id().clone()),
            image: None,
            video: None,
        }
    }

    /// Check the form against the loaded tree. `editing` is the category
    /// being edited, which cannot be its own parent, and which cannot take a
    /// parent while it has sub-categories of its own.
    ///
    /// # Errors
    ///
    /// The first failing rule.
    pub fn validate(
        &self,
        categories: &[Category],
        editing: Option<&CategoryId>,
    ) -> Result<CategorySubmission, ValidationError> {
        let name = validation::required("Category name", &self.name)?;

        let parent = self.parent.clone().filter(|p| !p.is_empty());
        if let Some(parent_id) = &parent {
            let valid_parent = editing != Some(parent_id)
                && categories
                    .iter()
                    .any(|c| &c.id == parent_id && c.is_main());
            if !valid_parent {
                return Err(ValidationError::InvalidParentCategory);
            }
            let has_subs = editing.is_some_and(|id| {
                categories
                    .iter()
                    .any(|c| c.parent_category.as_ref().is_some_and(|p| p.id() == id))
            });
            if has_subs {
                return Err(ValidationError::ParentOfSubCategories);
            }
        }
        if let Some(image) = &self.image {
            image.ensure_kind(MediaKind::Image)?;
        }
        if let Some(video) = &self.video {
            video.ensure_kind(MediaKind::Video)?;
        }

        Ok(CategorySubmission {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            parent,
            image: self.image.clone(),
            video: self.video.clone(),
        })
    }
}

/// A validated category form.
#[derive(Debug, Clone)]
pub struct CategorySubmission {
    name: String,
    description: String,
    parent: Option<CategoryId>,
    image: Option<MediaFile>,
    video: Option<MediaFile>,
}

impl CategorySubmission {
    #[must_use]
    pub fn into_multipart(self) -> MultipartBody {
        let mut body = MultipartBody::new()
            .text("name", self.name)
            .text("description", self.description)
            .text_opt("parentCategory", self.parent.map(CategoryId::into_inner));
        if let Some(image) = self.image {
            body = body.file("image", image);
        }
        if let Some(video) = self.video {
            body = body.file("video", video);
        }
        body
    }
}

/// Category list.
#[derive(Debug)]
pub struct CategoriesView {
    api: AdminApi,
    categories: Vec<Category>,
    notices: NoticeBoard,
}

impl CategoriesView {
    #[must_use]
    pub fn new(api: AdminApi, notices: NoticeDurations) -> Self {
        Self {
            api,
            categories: Vec::new(),
            notices: NoticeBoard::new(notices),
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Candidates for a parent selector.
    #[must_use]
    pub fn main_categories(&self) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.is_main()).collect()
    }

    #[must_use]
    pub fn sub_categories(&self, parent: &CategoryId) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.parent_category.as_ref().is_some_and(|p| p.id() == parent))
            .collect()
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
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), AppError> {
        match self.api.list_categories().await {
            Ok(response) => {
                self.categories = response.data_or_default().categories;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to load categories")),
        }
    }

    /// Re-fetch after a successful write. The write stands even if this
    /// fails; the stale list is kept.
    async fn reload(&mut self) {
        match self.api.list_categories().await {
            Ok(response) => self.categories = response.data_or_default().categories,
            Err(e) => warn!(error = %e, "Failed to refresh categories after update"),
        }
    }

    /// # Errors
    ///
    /// Validation or backend failure.
    #[instrument(skip(self, form))]
    pub async fn create(&mut self, form: &CategoryForm) -> Result<(), AppError> {
        let submission = form
            .validate(&self.categories, None)
            .map_err(|e| report(&mut self.notices, e, "Failed to create category"))?;
        match self.api.create_category(submission.into_multipart()).await {
            Ok(response) => {
                info!(name = %form.name, "Category created");
                self.notices
                    .success(response.message_or("Category created"), Instant::now());
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to create category")),
        }
    }

    /// # Errors
    ///
    /// Validation or backend failure.
    #[instrument(skip(self, form), fields(category_id = %id))]
    pub async fn update(&mut self, id: &CategoryId, form: &CategoryForm) -> Result<(), AppError> {
        let submission = form
            .validate(&self.categories, Some(id))
            .map_err(|e| report(&mut self.notices, e, "Failed to update category"))?;
        match self.api.update_category(id, submission.into_multipart()).await {
            Ok(response) => {
                info!(category_id = %id, "Category updated");
                self.notices
                    .success(response.message_or("Category updated"), Instant::now());
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to update category")),
        }
    }

    /// Delete after confirmation. `Ok(false)` when declined.
    ///
    /// # Errors
    ///
    /// Backend failure.
    #[instrument(skip(self, confirm), fields(category_id = %id))]
    pub async fn delete(&mut self, id: &CategoryId, confirm: &dyn Confirm) -> Result<bool, AppError> {
        let subs = self.sub_categories(id).len();
        let prompt = if subs > 0 {
            format!("Delete this category? Its {subs} sub-categories will lose their parent.")
        } else {
            "Delete this category?".to_string()
        };
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }
        match self.api.delete_category(id).await {
            Ok(response) => {
                info!(category_id = %id, "Category deleted");
                self.notices
                    .success(response.message_or("Category deleted"), Instant::now());
                self.reload().await;
                Ok(true)
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to delete category")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tree() -> Vec<Category> {
        serde_json::from_value(json!([
            { "_id": "main", "name": "Lighting" },
            { "_id": "sub", "name": "Lamps", "parentCategory": "main" }
        ]))
        .unwrap()
    }

    #[test]
    fn test_parent_must_be_existing_main_category() {
        let categories = tree();
        let form = |parent: &str| CategoryForm {
            name: "Desk lamps".to_string(),
            parent: Some(CategoryId::new(parent)),
            ..CategoryForm::default()
        };
        assert!(form("main").validate(&categories, None).is_ok());
        assert_eq!(
            form("sub").validate(&categories, None).unwrap_err(),
            ValidationError::InvalidParentCategory
        );
        assert_eq!(
            form("ghost").validate(&categories, None).unwrap_err(),
            ValidationError::InvalidParentCategory
        );
        assert_eq!(
            form("main")
                .validate(&categories, Some(&CategoryId::new("main")))
                .unwrap_err(),
            ValidationError::InvalidParentCategory
        );
    }

    #[test]
    fn test_main_with_subs_cannot_take_parent() {
        let mut categories = tree();
        categories.extend(
            serde_json::from_value::<Vec<Category>>(json!([{ "_id": "decor", "name": "Decor" }]))
                .unwrap(),
        );
        let form = CategoryForm {
            name: "Lighting".to_string(),
            parent: Some(CategoryId::new("decor")),
            ..CategoryForm::default()
        };
        assert_eq!(
            form.validate(&categories, Some(&CategoryId::new("main")))
                .unwrap_err(),
            ValidationError::ParentOfSubCategories
        );

        // A main category without subs can still move under another one.
        let form = CategoryForm {
            name: "Decor".to_string(),
            parent: Some(CategoryId::new("main")),
            ..CategoryForm::default()
        };
        assert!(form.validate(&categories, Some(&CategoryId::new("decor"))).is_ok());
    }

    #[test]
    fn test_media_types_checked() {
        let form = CategoryForm {
            name: "Lighting".to_string(),
            video: Some(MediaFile::new("v.png", "image/png", vec![1])),
            ..CategoryForm::default()
        };
        assert!(matches!(
            form.validate(&[], None),
            Err(ValidationError::WrongMediaType { .. })
        ));
    }

    #[test]
    fn test_multipart_fields() {
        let form = CategoryForm {
            name: " Lighting ".to_string(),
            image: Some(MediaFile::new("i.jpg", "image/jpeg", vec![1])),
            ..CategoryForm::default()
        };
        let body = form.validate(&[], None).unwrap().into_multipart();
        assert_eq!(body.text_values("name"), vec!["Lighting"]);
        assert!(body.text_values("parentCategory").is_empty());
        assert_eq!(body.file_count("image"), 1);
    }
}
