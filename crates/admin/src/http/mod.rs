//! HTTP client wrapper for the shop backend.
//!
//! Every request goes through [`HttpClient`], which:
//! - attaches `Authorization: Bearer <token>` when the session holds a token
//! - decodes JSON success bodies (an empty body decodes as `{}`)
//! - turns non-success responses into [`ApiError::Server`] carrying the
//!   backend's `{message}` / `{error}` payload
//! - on `401`, clears the session and navigates to the login route unless
//!   the host is already there
//!
//! No endpoint is special-cased.

mod error;

pub use error::ApiError;

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::ConsoleConfig;
use crate::media::MediaFile;
use crate::navigation::Navigator;
use crate::session::Session;

/// A field of a `multipart/form-data` body.
#[derive(Debug, Clone)]
enum FormField {
    Text(String),
    File(MediaFile),
}

/// Builder for multipart bodies.
///
/// Kept separate from [`reqwest::multipart::Form`] so a body can be
/// inspected and cloned before it is sent.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    fields: Vec<(String, FormField)>,
}

impl MultipartBody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), FormField::Text(value.into())));
        self
    }

    /// Append a text field when `value` is present.
    #[must_use]
    pub fn text_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    /// Append a file part.
    #[must_use]
    pub fn file(mut self, name: &str, file: MediaFile) -> Self {
        self.fields.push((name.to_string(), FormField::File(file)));
        self
    }

    /// Text values of `name`, in insertion order.
    #[must_use]
    pub fn text_values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .filter_map(|(_, f)| match f {
                FormField::Text(v) => Some(v.as_str()),
                FormField::File(_) => None,
            })
            .collect()
    }

    /// Number of file parts named `name`.
    #[must_use]
    pub fn file_count(&self, name: &str) -> usize {
        self.fields
            .iter()
            .filter(|(n, f)| n == name && matches!(f, FormField::File(_)))
            .count()
    }

    fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, field) in self.fields {
            form = match field {
                FormField::Text(value) => form.text(name, value),
                FormField::File(file) => {
                    let part = Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)
                        .map_err(|e| ApiError::Upload(e.to_string()))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

/// Shared HTTP client. Cheap to clone.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    client: reqwest::Client,
    base_url: String,
    session: Session,
    navigator: Arc<dyn Navigator>,
    login_route: String,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.base_url)
            .field("login_route", &self.inner.login_route)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a client for `config.api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: &ConsoleConfig,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("shop-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpClientInner {
                client,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                session,
                navigator,
                login_route: config.login_route.clone(),
            }),
        })
    }

    /// The session this client reads tokens from.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Absolute URL for an API path.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the result is not a valid URL.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}{path}", self.inner.base_url))?)
    }

    /// GET a JSON resource.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        self.send(self.request(Method::GET, url)).await
    }

    /// GET with query parameters.
    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut url = self.url(path)?;
        url.query_pairs_mut().extend_pairs(query);
        self.send(self.request(Method::GET, url)).await
    }

    /// POST a JSON body.
    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        self.send(self.request(Method::POST, url).json(body)).await
    }

    /// PUT a JSON body.
    pub(crate) async fn put_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        self.send(self.request(Method::PUT, url).json(body)).await
    }

    /// DELETE a resource.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        self.send(self.request(Method::DELETE, url)).await
    }

    /// POST a multipart body.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        let form = body.into_form()?;
        self.send(self.request(Method::POST, url).multipart(form)).await
    }

    /// PUT a multipart body.
    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        let form = body.into_form()?;
        self.send(self.request(Method::PUT, url).multipart(form)).await
    }

    /// Clear the session and leave for the login route.
    ///
    /// Shared by logout and 401 handling. Does nothing to navigation when
    /// the host already shows the login route.
    pub fn end_session(&self) {
        if let Err(e) = self.inner.session.clear() {
            error!(error = %e, "Failed to clear session");
        }

        let current = self.inner.navigator.current_route();
        let on_login = current
            .split(['?', '#'])
            .next()
            .is_some_and(|path| path == self.inner.login_route);
        if !on_login {
            self.inner.navigator.navigate(&self.inner.login_route);
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, path = url.path(), "Backend request");
        let builder = self.inner.client.request(method, url);
        match self.inner.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    #[instrument(skip(self, builder))]
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "Backend request failed");
            ApiError::from(e)
        })?;
        self.handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
            return serde_json::from_str(body)
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected the session token, ending session");
            self.end_session();
            return Err(ApiError::Unauthorized);
        }

        Err(Self::parse_error(response).await)
    }

    /// Decode `{message}` or `{error}` from an error response.
    async fn parse_error(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);

        error!(status, message = message.as_deref().unwrap_or(""), "Backend returned an error");
        ApiError::Server { status, message }
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .into_iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::to_string)
}
