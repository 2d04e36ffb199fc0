//! Unified error handling for the console.

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::ApiError;
use crate::orders::{ReportError, WorkflowError};
use crate::session::SessionError;
use crate::validation::ValidationError;

/// Application-level error type for console views and hosts.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Form input was rejected before sending.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Order action was rejected or failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report export failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// A referenced record is not loaded.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether the error was raised before any request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        match self {
            Self::Validation(_) | Self::NotFound(_) => true,
            Self::Workflow(e) => e.is_local(),
            Self::Api(_) | Self::Session(_) | Self::Config(_) | Self::Report(_) => false,
        }
    }

    /// Text for a notice. Backend failures use the server's message when it
    /// sent one, else `fallback`; local errors describe themselves.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) | Self::Workflow(WorkflowError::Api(e)) => e.user_message(fallback),
            _ => self.to_string(),
        }
    }
}
