//! Mock shop backend for end-to-end console tests.
//!
//! [`MockBackend`] binds an axum server on `127.0.0.1:0`, records every
//! request it receives and answers from a table of canned responses keyed by
//! method and path. Unknown routes get `404 {"message":"Not found"}`.
//!
//! ```rust,ignore
//! let backend = MockBackend::start().await;
//! backend.respond("GET", "/api/orders/json", 200, json!({ "data": { "orders": [] } }));
//! let (api, nav) = backend.logged_in_api();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;
use serde_json::{Value, json};
use shop_console::{AdminApi, ConsoleConfig, RouteTracker, Session};
use url::Url;

/// Token placed in the session by [`MockBackend::logged_in_api`].
pub const TEST_TOKEN: &str = "test-admin-token";

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body decoded as JSON, `Null` when it is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    body: String,
}

#[derive(Debug, Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), VecDeque<Canned>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Running mock backend. The server task lives as long as the runtime.
#[derive(Debug, Clone)]
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Bind and serve on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, state }
    }

    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Invalid mock URL")
    }

    #[must_use]
    pub fn config(&self) -> ConsoleConfig {
        ConsoleConfig::new(self.base_url())
    }

    /// Always answer `method path` with `status` and a JSON body.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    /// Always answer `method path` with a raw body.
    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        let mut routes = self.state.routes.lock().unwrap_or_else(PoisonError::into_inner);
        routes.insert(
            (method.to_string(), path.to_string()),
            VecDeque::from([Canned {
                status,
                body: body.to_string(),
            }]),
        );
    }

    /// Queue a further response; the last queued one repeats.
    pub fn respond_then(&self, method: &str, path: &str, status: u16, body: Value) {
        let mut routes = self.state.routes.lock().unwrap_or_else(PoisonError::into_inner);
        routes
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(Canned {
                status,
                body: body.to_string(),
            });
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests matching `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Client with an empty in-memory session, starting on `/orders`.
    #[must_use]
    pub fn api(&self) -> (AdminApi, Arc<RouteTracker>) {
        let nav = Arc::new(RouteTracker::new("/orders"));
        let api = AdminApi::new(&self.config(), Session::in_memory(), nav.clone())
            .expect("Failed to build client");
        (api, nav)
    }

    /// Client whose session already holds [`TEST_TOKEN`].
    #[must_use]
    pub fn logged_in_api(&self) -> (AdminApi, Arc<RouteTracker>) {
        let (api, nav) = self.api();
        api.session()
            .update_token(&SecretString::from(TEST_TOKEN))
            .expect("Failed to seed session");
        (api, nav)
    }
}

/// Wrap `data` in the backend envelope.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// Envelope with a message.
#[must_use]
pub fn envelope_with_message(message: &str, data: Value) -> Value {
    json!({ "success": true, "message": message, "data": data })
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.to_vec(),
    };
    let key = (recorded.method.clone(), recorded.path.clone());
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(recorded);

    let canned = {
        let mut routes = state.routes.lock().unwrap_or_else(PoisonError::into_inner);
        routes.get_mut(&key).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    match canned {
        Some(Canned { status, body }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "message": "Not found" }).to_string(),
        )
            .into_response(),
    }
}
