//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_console_core::ReviewId;

use super::catalog::ProductRef;

/// A customer review awaiting moderation or already published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: ReviewId,
    #[serde(default, alias = "productId")]
    pub product: Option<ProductRef>,
    #[serde(default, alias = "userName")]
    pub name: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Rating clamped into `1..=5`.
    #[must_use]
    pub fn stars(&self) -> u8 {
        self.rating.clamp(1, 5)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_with_populated_product() {
        let review: Review = serde_json::from_value(json!({
            "_id": "r1",
            "productId": { "_id": "p1", "name": "Lamp" },
            "userName": "Ira",
            "rating": 9,
            "comment": "Lovely"
        }))
        .unwrap();
        assert_eq!(review.name, "Ira");
        assert_eq!(review.stars(), 5);
        assert_eq!(review.product.unwrap().name(), Some("Lamp"));
    }
}
