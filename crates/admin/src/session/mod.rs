//! Persisted session state: the auth token and the cached admin profile.
//!
//! The session is the only client-side state shared between views. It is
//! written by login, logout, credential updates and 401 handling, and read
//! by every outgoing request. Storage sits behind [`SessionStore`] so tests
//! and hosts can inject their own backend.

mod file;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::warn;

pub use file::FileSessionStore;

use crate::config::ConsoleConfig;
use crate::models::AdminProfile;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "adminToken";

/// Storage key of the serialized admin profile.
pub const PROFILE_KEY: &str = "adminUser";

/// Errors raised by a session backend.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the backing file failed.
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized.
    #[error("Session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key-value storage for session state.
pub trait SessionStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Remove every stored value.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backend cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-process session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

/// Typed access to the session held in a [`SessionStore`].
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &"[SessionStore]")
            .finish()
    }
}

impl Session {
    /// Wrap a storage backend.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Session backed by [`MemorySessionStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// File-backed when `config.session_file` is set, in-memory otherwise.
    #[must_use]
    pub fn for_config(config: &ConsoleConfig) -> Self {
        match &config.session_file {
            Some(path) => Self::new(Arc::new(FileSessionStore::new(path.clone()))),
            None => Self::in_memory(),
        }
    }

    /// The bearer token, if logged in.
    ///
    /// Storage failures are logged and treated as "no token".
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The cached admin profile.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage fails or the cached value is corrupt.
    pub fn profile(&self) -> Result<Option<AdminProfile>, SessionError> {
        self.store
            .get(PROFILE_KEY)?
            .map(|raw| serde_json::from_str(&raw).map_err(SessionError::from))
            .transpose()
    }

    /// Persist a fresh login.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage fails.
    pub fn store_login(&self, token: &SecretString, profile: &AdminProfile) -> Result<(), SessionError> {
        self.store.set(TOKEN_KEY, token.expose_secret())?;
        self.update_profile(profile)
    }

    /// Replace the cached profile (after a credential update).
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage fails.
    pub fn update_profile(&self, profile: &AdminProfile) -> Result<(), SessionError> {
        let raw = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &raw)
    }

    /// Replace the token only.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage fails.
    pub fn update_token(&self, token: &SecretString) -> Result<(), SessionError> {
        self.store.set(TOKEN_KEY, token.expose_secret())
    }

    /// Remove all persisted session state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage fails.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.clear()
    }
}
