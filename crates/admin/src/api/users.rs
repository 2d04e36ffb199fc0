//! Customer administration.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use shop_console_core::UserId;
use tracing::instrument;

use super::{Ack, AdminApi, ApiResponse};
use crate::http::ApiError;
use crate::models::{User, UserUpdate};

/// `data` of `GET /api/admin/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UsersPayload {
    pub users: Vec<User>,
}

/// `data` of single-user endpoints. Writes may omit the echoed record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    pub user: Option<User>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActiveBody {
    is_active: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordBody<'a> {
    new_password: &'a str,
}

fn user_path(id: &UserId) -> String {
    format!("/api/admin/users/{id}")
}

impl AdminApi {
    /// All customer accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<ApiResponse<UsersPayload>, ApiError> {
        self.http.get("/api/admin/users").await
    }

    /// One customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &UserId) -> Result<ApiResponse<UserPayload>, ApiError> {
        self.http.get(&user_path(id)).await
    }

    /// Edit profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: &UserId,
        update: &UserUpdate,
    ) -> Result<ApiResponse<UserPayload>, ApiError> {
        self.http.put_json(&user_path(id), update).await
    }

    /// Block (`false`) or unblock (`true`) an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn set_user_active(
        &self,
        id: &UserId,
        active: bool,
    ) -> Result<ApiResponse<UserPayload>, ApiError> {
        self.http
            .put_json(&user_path(id), &ActiveBody { is_active: active })
            .await
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<Ack, ApiError> {
        self.http.delete(&user_path(id)).await
    }

    /// Set a new password for a password-based account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, new_password), fields(user_id = %id))]
    pub async fn reset_user_password(
        &self,
        id: &UserId,
        new_password: &SecretString,
    ) -> Result<Ack, ApiError> {
        let body = PasswordBody {
            new_password: new_password.expose_secret(),
        };
        self.http
            .post_json(&format!("{}/reset-password", user_path(id)), &body)
            .await
    }
}
