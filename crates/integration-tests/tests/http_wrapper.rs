//! Request wrapper behaviour: bearer header, error decoding and 401 handling.

#![allow(clippy::unwrap_used)]

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use shop_console::ApiError;
use shop_console_integration_tests::{MockBackend, TEST_TOKEN, envelope};

#[tokio::test]
async fn test_bearer_token_attached_only_when_logged_in() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/api/orders/json", 200, envelope(json!({ "orders": [] })));

    let (anonymous, _) = backend.api();
    anonymous.list_orders().await.unwrap();
    let (api, _) = backend.logged_in_api();
    api.list_orders().await.unwrap();

    let requests = backend.requests_to("GET", "/api/orders/json");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].authorization, None);
    assert_eq!(
        requests[1].authorization.as_deref(),
        Some(format!("Bearer {TEST_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_redirects_once() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/api/orders/json", 401, json!({ "message": "Token expired" }));

    let (api, nav) = backend.logged_in_api();
    let err = api.list_orders().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(!api.session().is_authenticated());

    // Second 401 arrives while the host is already on the login route.
    let _ = api.list_orders().await.unwrap_err();
    assert_eq!(nav.redirects(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_server_message_is_surfaced() {
    let backend = MockBackend::start().await;
    backend.respond(
        "DELETE",
        "/api/reviews/r1",
        400,
        json!({ "error": "Review is locked" }),
    );

    let (api, nav) = backend.logged_in_api();
    let err = api.delete_review(&"r1".into()).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message("Failed to delete review"), "Review is locked");
    assert!(nav.redirects().is_empty());
    assert!(api.session().is_authenticated());
}

#[tokio::test]
async fn test_empty_success_body_is_accepted() {
    let backend = MockBackend::start().await;
    backend.respond_raw("DELETE", "/api/reviews/r1", 200, "");

    let (api, _) = backend.logged_in_api();
    let ack = api.delete_review(&"r1".into()).await.unwrap();
    assert_eq!(ack.message_or("Review deleted"), "Review deleted");
}

#[tokio::test]
async fn test_login_persists_token_and_profile() {
    let backend = MockBackend::start().await;
    backend.respond(
        "POST",
        "/api/admin/auth/login",
        200,
        envelope(json!({
            "token": "fresh-token",
            "admin": { "_id": "a1", "name": "Asha", "email": "asha@shop.example" }
        })),
    );

    let (api, _) = backend.api();
    api.login("asha@shop.example", &SecretString::from("hunter22"))
        .await
        .unwrap();

    assert_eq!(api.session().token().unwrap().expose_secret(), "fresh-token");
    assert_eq!(api.session().profile().unwrap().unwrap().name, "Asha");
    let sent = backend.requests_to("POST", "/api/admin/auth/login");
    assert_eq!(sent[0].json()["email"], "asha@shop.example");
    assert_eq!(sent[0].json()["password"], "hunter22");
}

#[tokio::test]
async fn test_logout_redirects_to_login() {
    let backend = MockBackend::start().await;
    let (api, nav) = backend.logged_in_api();
    api.logout();
    assert!(!api.session().is_authenticated());
    assert_eq!(nav.redirects(), vec!["/login".to_string()]);
    assert!(backend.requests().is_empty());
}
