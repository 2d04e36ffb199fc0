//! Domain API facade.
//!
//! Maps each named console operation onto one HTTP call through
//! [`HttpClient`]. The facade holds no business logic: no retries, no
//! caching, and errors are passed through untouched. Views read the
//! server's message from [`ApiError::server_message`] and fall back to
//! their own text.
//!
//! Binary payloads go out as `multipart/form-data`, every other write as
//! JSON, and reads are plain `GET`s.

mod analytics;
mod announcements;
mod auth;
mod categories;
mod orders;
mod products;
mod reviews;
mod users;

pub use analytics::Period;
pub use announcements::{AnnouncementPayload, AnnouncementsPayload};
pub use auth::{CredentialsData, CredentialsUpdate, LoginData, SignupRequest, VerifyData};
pub use categories::{CategoriesPayload, CategoryPayload};
pub use orders::{OrderActionData, OrdersPayload};
pub use products::{Catalog, ProductPayload, ProductsPayload};
pub use reviews::ReviewsPayload;
pub use users::{UserPayload, UsersPayload};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ConsoleConfig;
use crate::http::{ApiError, HttpClient};
use crate::navigation::Navigator;
use crate::session::Session;

/// Standard response envelope: `{ success?, message?, data? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// The payload, or a parse error when the envelope has none.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Parse` when `data` is absent.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::Parse("response has no data".to_string()))
    }

    /// Server message if non-blank, else `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

impl<T: Default> ApiResponse<T> {
    /// The payload, or `T::default()` when absent.
    #[must_use]
    pub fn data_or_default(self) -> T {
        self.data.unwrap_or_default()
    }
}

/// Envelope whose payload the console does not inspect.
pub type Ack = ApiResponse<serde_json::Value>;

/// Entry point for all backend operations.
#[derive(Debug, Clone)]
pub struct AdminApi {
    http: HttpClient,
}

impl AdminApi {
    /// Build the facade and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: &ConsoleConfig,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new(config, session, navigator)?,
        })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.http.session()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_envelope_helpers() {
        let resp: ApiResponse<Vec<u8>> =
            serde_json::from_value(json!({ "success": true, "message": "" })).unwrap();
        assert_eq!(resp.message_or("Saved"), "Saved");
        assert!(resp.clone().data_or_default().is_empty());
        assert!(matches!(resp.into_data(), Err(ApiError::Parse(_))));

        let resp: ApiResponse<u8> =
            serde_json::from_value(json!({ "message": "Done", "data": 3 })).unwrap();
        assert_eq!(resp.message_or("Saved"), "Done");
        assert_eq!(resp.into_data().unwrap(), 3);
    }
}
