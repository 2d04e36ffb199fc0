//! Storefront customers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_console_core::UserId;

/// A storefront customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Set for accounts created through Google sign-in.
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_active() -> bool {
    true
}

impl User {
    /// OAuth-origin accounts have no password to reset.
    #[must_use]
    pub fn is_google_account(&self) -> bool {
        self.google_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Case-insensitive match on name, email or phone.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.phone.as_deref().is_some_and(|p| p.contains(&needle))
    }
}

/// Editable profile fields sent with `PUT /api/admin/users/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults_to_active() {
        let user: User = serde_json::from_value(json!({ "_id": "u1", "name": "Meera" })).unwrap();
        assert!(user.is_active);
        assert!(!user.is_google_account());
    }

    #[test]
    fn test_google_account_and_search() {
        let user: User = serde_json::from_value(json!({
            "_id": "u2",
            "name": "Kabir Singh",
            "email": "kabir@mail.example",
            "phone": "9876543210",
            "googleId": "1093",
            "isActive": false
        }))
        .unwrap();
        assert!(user.is_google_account());
        assert!(!user.is_active);
        assert!(user.matches("KABIR"));
        assert!(user.matches("98765"));
        assert!(!user.matches("meera"));
    }
}
