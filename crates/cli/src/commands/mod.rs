//! Command implementations.
//!
//! Each command builds the view or console it needs from a shared
//! [`Context`], runs one operation and prints the outcome.

pub mod auth;
pub mod catalog;
pub mod content;
pub mod dashboard;
pub mod orders;
pub mod users;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use shop_console::config::ConfigError;
use shop_console::orders::ReportError;
use shop_console::session::SessionError;
use shop_console::{AdminApi, ApiError, AppError, ConsoleConfig, RouteTracker, Session, WorkflowError};
use thiserror::Error;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Not logged in. Run `shop-console login` first.")]
    NotLoggedIn,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration, session and API client shared by every command.
pub struct Context {
    pub config: ConsoleConfig,
    pub api: AdminApi,
    navigator: Arc<RouteTracker>,
}

impl Context {
    /// Build from CLI arguments, falling back to the environment.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` for a missing or invalid backend URL.
    pub fn new(api_url: Option<&str>, session_file: PathBuf) -> Result<Self, CliError> {
        let session_path = session_file.display().to_string();
        let mut config = ConsoleConfig::from_lookup(|key| match key {
            "SHOP_CONSOLE_API_URL" => api_url.map(str::to_string),
            "SHOP_CONSOLE_SESSION_FILE" => Some(session_path.clone()),
            _ => std::env::var(key).ok().filter(|v| !v.trim().is_empty()),
        })?;
        config.session_file = Some(session_file);

        let navigator = Arc::new(RouteTracker::new("/"));
        let api = AdminApi::new(&config, Session::for_config(&config), navigator.clone())?;
        Ok(Self {
            config,
            api,
            navigator,
        })
    }

    /// Fail early when no token is stored.
    ///
    /// # Errors
    ///
    /// `CliError::NotLoggedIn` without a token.
    pub fn require_login(&self) -> Result<(), CliError> {
        if self.api.session().is_authenticated() {
            Ok(())
        } else {
            Err(CliError::NotLoggedIn)
        }
    }

    /// Explain an expired session after a command ran into a 401.
    pub fn report_session_end(&self) {
        if !self.navigator.redirects().is_empty() {
            tracing::warn!("Session expired; log in again");
        }
    }
}

/// Ask on stdin; anything but `y`/`yes` declines.
pub fn confirm_on_terminal(prompt: &str) -> bool {
    let mut stdout = std::io::stdout();
    if write!(stdout, "{prompt} [y/N] ").and_then(|()| stdout.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Auto-accepting confirmation for `--yes`.
pub fn confirmer(yes: bool) -> impl Fn(&str) -> bool {
    move |prompt| yes || confirm_on_terminal(prompt)
}
