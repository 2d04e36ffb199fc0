//! The signed-in administrator.

use serde::{Deserialize, Serialize};
use shop_console_core::{AdminId, Email};

/// Admin profile cached in the session after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: AdminId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Whether the backend already has an administrator account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthStatus {
    pub admin_exists: bool,
    pub signup_allowed: bool,
}
