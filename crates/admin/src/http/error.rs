//! Errors surfaced by the HTTP wrapper.

use thiserror::Error;

/// Errors that can occur when talking to the shop backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The backend rejected the session; it has been cleared.
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// The backend returned a non-success status.
    #[error("API error {status}: {}", message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// A success response could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A multipart body could not be assembled.
    #[error("Upload error: {0}")]
    Upload(String),
}

impl ApiError {
    /// The backend's own message, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Text for a notice: the backend message, else `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Server {
            status: 400,
            message: Some("Refund already processed".to_string()),
        };
        assert_eq!(err.user_message("Failed to process refund"), "Refund already processed");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_user_message_falls_back() {
        let blank = ApiError::Server {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message("Failed to update order"), "Failed to update order");
        assert_eq!(
            ApiError::Parse("x".to_string()).user_message("Failed to load orders"),
            "Failed to load orders"
        );
    }
}
