//! Customer administration.

use std::time::Instant;

use secrecy::SecretString;
use shop_console_core::{Email, UserId};
use tracing::{info, instrument, warn};

use super::{Confirm, report};
use crate::api::AdminApi;
use crate::config::NoticeDurations;
use crate::error::AppError;
use crate::models::{User, UserUpdate};
use crate::notices::{Notice, NoticeBoard};
use crate::validation::{self, ValidationError};

/// Raw user edit form.
#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl UserForm {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            address: user.address.clone().unwrap_or_default(),
        }
    }

    /// # Errors
    ///
    /// `Required` for a blank name, `Email` for a malformed address.
    pub fn validate(&self) -> Result<UserUpdate, ValidationError> {
        let name = validation::required("Name", &self.name)?;
        let email = Email::parse(&self.email)?;
        let optional = |v: &str| Some(v.trim().to_string()).filter(|v| !v.is_empty());
        Ok(UserUpdate {
            name: name.to_string(),
            email: email.into_inner(),
            phone: optional(&self.phone),
            address: optional(&self.address),
        })
    }
}

/// Customer list with search.
#[derive(Debug)]
pub struct UsersView {
    api: AdminApi,
    users: Vec<User>,
    search: String,
    notices: NoticeBoard,
}

impl UsersView {
    #[must_use]
    pub fn new(api: AdminApi, notices: NoticeDurations) -> Self {
        Self {
            api,
            users: Vec::new(),
            search: String::new(),
            notices: NoticeBoard::new(notices),
        }
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Users matching the search box.
    #[must_use]
    pub fn visible_users(&self) -> Vec<&User> {
        self.users.iter().filter(|u| u.matches(&self.search)).collect()
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
        match self.api.list_users().await {
            Ok(response) => {
                self.users = response.data_or_default().users;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to load users")),
        }
    }

    /// Re-fetch after a successful write. The write stands even if this
    /// fails; the stale list is kept.
    async fn reload(&mut self) {
        match self.api.list_users().await {
            Ok(response) => self.users = response.data_or_default().users,
            Err(e) => warn!(error = %e, "Failed to refresh users after update"),
        }
    }

    /// Block an active user or unblock a blocked one. Returns the new state.
    ///
    /// # Errors
    ///
    /// `NotFound` or backend failure.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn toggle_active(&mut self, id: &UserId) -> Result<bool, AppError> {
        let Some(user) = self.user(id) else {
            return Err(report(
                &mut self.notices,
                AppError::NotFound(format!("user {id}")),
                "User not found",
            ));
        };
        let active = !user.is_active;
        match self.api.set_user_active(id, active).await {
            Ok(response) => {
                info!(user_id = %id, active, "User access changed");
                let default = if active { "User unblocked" } else { "User blocked" };
                self.notices
                    .success(response.message_or(default), Instant::now());
                self.reload().await;
                Ok(active)
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to update user status")),
        }
    }

    /// # Errors
    ///
    /// Validation or backend failure.
    #[instrument(skip(self, form), fields(user_id = %id))]
    pub async fn update(&mut self, id: &UserId, form: &UserForm) -> Result<(), AppError> {
        let update = form
            .validate()
            .map_err(|e| report(&mut self.notices, e, "Failed to update user"))?;
        match self.api.update_user(id, &update).await {
            Ok(response) => {
                info!(user_id = %id, "User updated");
                self.notices
                    .success(response.message_or("User updated"), Instant::now());
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to update user")),
        }
    }

    /// Set a new password. Unavailable for Google accounts.
    ///
    /// # Errors
    ///
    /// `GoogleAccount`, password rules, `NotFound` or backend failure.
    #[instrument(skip(self, password, confirmation), fields(user_id = %id))]
    pub async fn reset_password(
        &mut self,
        id: &UserId,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(), AppError> {
        let Some(user) = self.user(id) else {
            return Err(report(
                &mut self.notices,
                AppError::NotFound(format!("user {id}")),
                "User not found",
            ));
        };
        let checked = if user.is_google_account() {
            Err(ValidationError::GoogleAccount)
        } else {
            validation::new_password(password, confirmation)
        };
        checked.map_err(|e| report(&mut self.notices, e, "Failed to reset password"))?;

        match self.api.reset_user_password(id, password).await {
            Ok(response) => {
                info!(user_id = %id, "User password reset");
                self.notices
                    .success(response.message_or("Password reset successfully"), Instant::now());
                Ok(())
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to reset password")),
        }
    }

    /// Delete after confirmation. `Ok(false)` when declined.
    ///
    /// # Errors
    ///
    /// Backend failure.
    #[instrument(skip(self, confirm), fields(user_id = %id))]
    pub async fn delete(&mut self, id: &UserId, confirm: &dyn Confirm) -> Result<bool, AppError> {
        let label = self.user(id).map_or_else(|| id.to_string(), |u| u.name.clone());
        if !confirm.confirm(&format!("Delete user \"{label}\"? This cannot be undone.")) {
            return Ok(false);
        }
        match self.api.delete_user(id).await {
            Ok(response) => {
                info!(user_id = %id, "User deleted");
                self.notices
                    .success(response.message_or("User deleted"), Instant::now());
                self.reload().await;
                Ok(true)
            }
            Err(e) => Err(report(&mut self.notices, e, "Failed to delete user")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::config::ConsoleConfig;
    use crate::navigation::RouteTracker;
    use crate::session::Session;

    fn offline_view(users: serde_json::Value) -> UsersView {
        let config = ConsoleConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        let api = AdminApi::new(&config, Session::in_memory(), Arc::new(RouteTracker::default()))
            .unwrap();
        let mut view = UsersView::new(api, NoticeDurations::default());
        view.users = serde_json::from_value(users).unwrap();
        view
    }

    #[test]
    fn test_form_validation() {
        let form = UserForm {
            name: "Meera".to_string(),
            email: "meera@mail".to_string(),
            ..UserForm::default()
        };
        assert!(matches!(form.validate(), Err(ValidationError::Email(_))));

        let form = UserForm {
            name: "Meera".to_string(),
            email: " meera@mail.example ".to_string(),
            phone: " ".to_string(),
            ..UserForm::default()
        };
        let update = form.validate().unwrap();
        assert_eq!(update.email, "meera@mail.example");
        assert!(update.phone.is_none());
    }

    #[tokio::test]
    async fn test_google_account_reset_blocked_locally() {
        let mut view = offline_view(json!([{ "_id": "u1", "name": "G", "googleId": "123" }]));
        let pw = SecretString::from("secret123");
        let err = view
            .reset_password(&UserId::new("u1"), &pw, &pw)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::GoogleAccount)));
        assert!(err.is_local());
    }

    #[tokio::test]
    async fn test_password_mismatch_blocked_locally() {
        let mut view = offline_view(json!([{ "_id": "u1", "name": "P" }]));
        let err = view
            .reset_password(
                &UserId::new("u1"),
                &SecretString::from("secret123"),
                &SecretString::from("secret124"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::PasswordMismatch)));
        assert_eq!(
            view.latest_notice().map(|n| n.message.as_str()),
            Some("Passwords do not match")
        );
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let mut view = offline_view(json!([{ "_id": "u1", "name": "P" }]));
        let deleted = view.delete(&UserId::new("u1"), &|_: &str| false).await.unwrap();
        assert!(!deleted);
        assert_eq!(view.users().len(), 1);
    }

    #[test]
    fn test_search() {
        let mut view = offline_view(json!([
            { "_id": "u1", "name": "Asha", "email": "asha@x.example" },
            { "_id": "u2", "name": "Ravi", "email": "ravi@x.example" }
        ]));
        view.set_search("rav");
        assert_eq!(view.visible_users().len(), 1);
        view.set_search("");
        assert_eq!(view.visible_users().len(), 2);
    }
}
