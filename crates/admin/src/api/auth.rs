//! Administrator authentication.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, instrument, warn};

use super::{Ack, AdminApi, ApiResponse};
use crate::http::ApiError;
use crate::models::{AdminProfile, AuthStatus};

/// Payload of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(deserialize_with = "secret")]
    pub token: SecretString,
    pub admin: AdminProfile,
}

/// Payload of a credential update. The backend reissues the token when the
/// email or password changes.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsData {
    pub admin: AdminProfile,
    #[serde(default, deserialize_with = "optional_secret")]
    pub token: Option<SecretString>,
}

/// Payload of `GET /api/admin/auth/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyData {
    #[serde(default)]
    pub admin: Option<AdminProfile>,
}

/// First-admin signup.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// Changes to the signed-in admin's account. `current_password` is always
/// required; blank optional fields are left unchanged.
#[derive(Debug, Clone)]
pub struct CredentialsUpdate {
    pub current_password: SecretString,
    pub name: Option<String>,
    pub email: Option<String>,
    pub new_password: Option<SecretString>,
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

fn optional_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|t| !t.is_empty())
        .map(SecretString::from))
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OtpResetBody<'a> {
    email: &'a str,
    otp: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsBody<'a> {
    current_password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_password: Option<&'a str>,
}

impl AdminApi {
    /// Log in and persist the token and profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response carries no
    /// credentials, or the session cannot be written.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<ApiResponse<LoginData>, ApiError> {
        let body = LoginBody {
            email,
            password: password.expose_secret(),
        };
        let response: ApiResponse<LoginData> =
            self.http.post_json("/api/admin/auth/login", &body).await?;

        let data = response
            .data
            .as_ref()
            .ok_or_else(|| ApiError::Parse("login response has no credentials".to_string()))?;
        self.session()
            .store_login(&data.token, &data.admin)
            .map_err(|e| ApiError::Parse(format!("Failed to persist session: {e}")))?;

        info!(admin_id = %data.admin.id, "Admin logged in");
        Ok(response)
    }

    /// Create the first administrator account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<Ack, ApiError> {
        let body = SignupBody {
            name: &request.name,
            email: &request.email,
            password: request.password.expose_secret(),
        };
        self.http.post_json("/api/admin/auth/signup", &body).await
    }

    /// Email a password reset OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<Ack, ApiError> {
        self.http
            .post_json("/api/admin/auth/forgot-password", &EmailBody { email })
            .await
    }

    /// Reset the password with an emailed OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, otp, new_password))]
    pub async fn verify_otp_reset(
        &self,
        email: &str,
        otp: &str,
        new_password: &SecretString,
    ) -> Result<Ack, ApiError> {
        let body = OtpResetBody {
            email,
            otp,
            new_password: new_password.expose_secret(),
        };
        self.http
            .post_json("/api/admin/auth/verify-otp-reset", &body)
            .await
    }

    /// Update the signed-in admin's credentials and refresh the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_credentials(
        &self,
        update: &CredentialsUpdate,
    ) -> Result<ApiResponse<CredentialsData>, ApiError> {
        let body = CredentialsBody {
            current_password: update.current_password.expose_secret(),
            name: update.name.as_deref().filter(|s| !s.trim().is_empty()),
            email: update.email.as_deref().filter(|s| !s.trim().is_empty()),
            new_password: update
                .new_password
                .as_ref()
                .map(ExposeSecret::expose_secret)
                .filter(|s| !s.is_empty()),
        };
        let response: ApiResponse<CredentialsData> = self
            .http
            .put_json("/api/admin/auth/update-credentials", &body)
            .await?;

        if let Some(data) = &response.data {
            let session = self.session();
            let stored = session.update_profile(&data.admin).and_then(|()| {
                data.token
                    .as_ref()
                    .map_or(Ok(()), |token| session.update_token(token))
            });
            if let Err(e) = stored {
                warn!(error = %e, "Failed to refresh session after credential update");
            }
            info!(admin_id = %data.admin.id, "Admin credentials updated");
        }
        Ok(response)
    }

    /// Check the current token; refreshes the cached profile when returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (`Unauthorized` ends the session).
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Result<ApiResponse<VerifyData>, ApiError> {
        let response: ApiResponse<VerifyData> = self.http.get("/api/admin/auth/verify").await?;
        if let Some(admin) = response.data.as_ref().and_then(|d| d.admin.as_ref()) {
            if let Err(e) = self.session().update_profile(admin) {
                warn!(error = %e, "Failed to cache admin profile");
            }
        }
        Ok(response)
    }

    /// Whether an admin exists and signup is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn auth_status(&self) -> Result<ApiResponse<AuthStatus>, ApiError> {
        self.http.get("/api/admin/auth/status").await
    }

    /// Drop the local session and return to the login route.
    pub fn logout(&self) {
        info!("Admin logged out");
        self.http.end_session();
    }
}
