//! Products, loved items and their categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_console_core::{CategoryId, Price, ProductId};

/// A reference that the backend may send either as a bare id or populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(CategoryId),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: CategoryId,
        #[serde(default)]
        name: String,
    },
}

impl CategoryRef {
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Id(id) | Self::Populated { id, .. } => id,
        }
    }

    /// Display name, only known when populated.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated { name, .. } => Some(name.as_str()),
        }
    }
}

/// Product reference embedded in reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(ProductId),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: ProductId,
        #[serde(default)]
        name: String,
    },
}

impl ProductRef {
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        match self {
            Self::Id(id) | Self::Populated { id, .. } => id,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated { name, .. } => Some(name.as_str()),
        }
    }
}

/// A shop product or loved item. Both catalogs share the record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default, alias = "colour")]
    pub color: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub utility: Option<String>,
    #[serde(default)]
    pub care: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub sub_category: Option<CategoryRef>,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub regular_price: Price,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub is_best_seller: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_most_loved: bool,
    #[serde(default)]
    pub cod_available: bool,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Position of a category in the two-level tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLevel {
    Main,
    Sub,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: CategoryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub parent_category: Option<CategoryRef>,
}

impl Category {
    #[must_use]
    pub const fn level(&self) -> CategoryLevel {
        if self.parent_category.is_some() {
            CategoryLevel::Sub
        } else {
            CategoryLevel::Main
        }
    }

    #[must_use]
    pub const fn is_main(&self) -> bool {
        matches!(self.level(), CategoryLevel::Main)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_with_bare_and_populated_refs() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Brass Lamp",
            "category": "c1",
            "subCategory": { "_id": "c7", "name": "Table lamps" },
            "price": 450,
            "regularPrice": 600,
            "images": ["/uploads/a.jpg"],
            "inStock": true,
            "stock": 3
        }))
        .unwrap();
        assert_eq!(product.category.as_ref().unwrap().id().as_str(), "c1");
        assert_eq!(product.category.as_ref().unwrap().name(), None);
        assert_eq!(product.sub_category.as_ref().unwrap().name(), Some("Table lamps"));
        assert!(product.price < product.regular_price);
    }

    #[test]
    fn test_category_levels() {
        let main: Category = serde_json::from_value(json!({ "_id": "c1", "name": "Lighting" })).unwrap();
        let sub: Category = serde_json::from_value(json!({
            "_id": "c7",
            "name": "Table lamps",
            "parentCategory": "c1"
        }))
        .unwrap();
        assert_eq!(main.level(), CategoryLevel::Main);
        assert_eq!(sub.level(), CategoryLevel::Sub);
        assert_eq!(sub.parent_category.unwrap().id().as_str(), "c1");
    }
}
