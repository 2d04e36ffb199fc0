//! Route awareness for session expiry redirects.

use std::sync::{Mutex, PoisonError};

/// Host-provided navigation.
pub trait Navigator: Send + Sync {
    /// The route currently displayed.
    fn current_route(&self) -> String;

    /// Move to `route`.
    fn navigate(&self, route: &str);
}

/// In-memory navigator that remembers every redirect.
#[derive(Debug)]
pub struct RouteTracker {
    state: Mutex<RouteState>,
}

#[derive(Debug)]
struct RouteState {
    current: String,
    history: Vec<String>,
}

impl RouteTracker {
    /// Start on `route`.
    #[must_use]
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(RouteState {
                current: route.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Routes navigated to, oldest first.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for RouteTracker {
    fn current_route(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    fn navigate(&self, route: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.current = route.to_string();
        state.history.push(route.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_records_history() {
        let nav = RouteTracker::new("/orders");
        assert_eq!(nav.current_route(), "/orders");
        nav.navigate("/login");
        assert_eq!(nav.current_route(), "/login");
        assert_eq!(nav.redirects(), vec!["/login".to_string()]);
    }
}
