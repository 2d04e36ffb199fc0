//! Resource views against the mock backend.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use serde_json::json;
use shop_console::AppError;
use shop_console::api::Catalog;
use shop_console::config::NoticeDurations;
use shop_console::models::AnnouncementDraft;
use shop_console::validation::ValidationError;
use shop_console::views::{AnnouncementsView, CategoriesView, ProductForm, ProductsView, UsersView};
use shop_console_core::{CategoryId, ProductId, UserId};
use shop_console_integration_tests::{MockBackend, envelope, envelope_with_message};

fn lamp_form() -> ProductForm {
    ProductForm {
        name: "Brass lamp".to_string(),
        description: "Hand finished".to_string(),
        category: Some(CategoryId::new("c1")),
        price: "499".to_string(),
        regular_price: "599".to_string(),
        stock: "3".to_string(),
        in_stock: true,
        existing_images: vec!["/uploads/a.jpg".to_string()],
        ..ProductForm::default()
    }
}

#[tokio::test]
async fn test_product_create_posts_multipart_and_reloads() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/api/shop", 200, envelope(json!({ "products": [] })));
    backend.respond(
        "POST",
        "/api/shop",
        201,
        envelope_with_message("Product added", json!({ "product": { "_id": "p1", "name": "Brass lamp" } })),
    );

    let (api, _) = backend.logged_in_api();
    let mut view = ProductsView::new(api, Catalog::Shop, NoticeDurations::default());
    view.create(&lamp_form()).await.unwrap();

    let sent = backend.requests_to("POST", "/api/shop");
    assert_eq!(sent.len(), 1);
    assert!(
        sent[0]
            .content_type
            .as_deref()
            .unwrap()
            .starts_with("multipart/form-data")
    );
    let body = sent[0].body_text();
    assert!(body.contains("name=\"regularPrice\""));
    assert!(body.contains("/uploads/a.jpg"));
    assert_eq!(view.latest_notice().unwrap().message, "Product added");
    assert_eq!(backend.requests_to("GET", "/api/shop").len(), 1);
}

#[tokio::test]
async fn test_invalid_product_never_sent() {
    let backend = MockBackend::start().await;
    let (api, _) = backend.logged_in_api();
    let mut view = ProductsView::new(api, Catalog::Loved, NoticeDurations::default());

    let form = ProductForm {
        price: "700".to_string(),
        ..lamp_form()
    };
    let err = view.create(&form).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::PriceAboveRegular)
    ));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_loved_items_use_their_own_endpoint() {
    let backend = MockBackend::start().await;
    backend.respond(
        "GET",
        "/api/loved",
        200,
        envelope(json!({ "lovedItems": [{ "_id": "l1", "name": "Quilt" }] })),
    );
    backend.respond("DELETE", "/api/loved/l1", 200, envelope(json!({})));

    let (api, _) = backend.logged_in_api();
    let mut view = ProductsView::new(api, Catalog::Loved, NoticeDurations::default());
    view.load().await.unwrap();
    assert_eq!(view.products().len(), 1);

    let deleted = view
        .delete(&ProductId::new("l1"), &|_: &str| true)
        .await
        .unwrap();
    assert!(deleted);
    assert_eq!(backend.requests_to("DELETE", "/api/loved/l1").len(), 1);
}

#[tokio::test]
async fn test_product_create_survives_failed_reload() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/api/shop", 500, json!({ "message": "list down" }));
    backend.respond(
        "POST",
        "/api/shop",
        201,
        envelope_with_message("Product added", json!({})),
    );

    let (api, _) = backend.logged_in_api();
    let mut view = ProductsView::new(api, Catalog::Shop, NoticeDurations::default());
    view.create(&lamp_form()).await.unwrap();

    assert_eq!(backend.requests_to("POST", "/api/shop").len(), 1);
    assert_eq!(backend.requests_to("GET", "/api/shop").len(), 1);
    assert_eq!(view.latest_notice().unwrap().message, "Product added");
}

#[tokio::test]
async fn test_user_block_survives_failed_reload() {
    let backend = MockBackend::start().await;
    backend.respond(
        "GET",
        "/api/admin/users",
        200,
        envelope(json!({ "users": [{ "_id": "u1", "name": "Ravi", "isActive": true }] })),
    );
    backend.respond_then("GET", "/api/admin/users", 500, json!({ "message": "list down" }));
    backend.respond("PUT", "/api/admin/users/u1", 200, envelope(json!({})));

    let (api, _) = backend.logged_in_api();
    let mut view = UsersView::new(api, NoticeDurations::default());
    view.load().await.unwrap();

    assert!(!view.toggle_active(&UserId::new("u1")).await.unwrap());
    assert_eq!(view.users().len(), 1);
    assert_eq!(view.latest_notice().unwrap().message, "User blocked");
}

#[tokio::test]
async fn test_user_block_toggle_sends_inverse_state() {
    let backend = MockBackend::start().await;
    backend.respond(
        "GET",
        "/api/admin/users",
        200,
        envelope(json!({ "users": [{ "_id": "u1", "name": "Ravi", "isActive": true }] })),
    );
    backend.respond("PUT", "/api/admin/users/u1", 200, envelope(json!({})));

    let (api, _) = backend.logged_in_api();
    let mut view = UsersView::new(api, NoticeDurations::default());
    view.load().await.unwrap();

    let active = view.toggle_active(&UserId::new("u1")).await.unwrap();
    assert!(!active);
    let sent = backend.requests_to("PUT", "/api/admin/users/u1");
    assert_eq!(sent[0].json()["isActive"], json!(false));
    assert_eq!(view.latest_notice().unwrap().message, "User blocked");
}

#[tokio::test]
async fn test_category_delete_failure_keeps_list() {
    let backend = MockBackend::start().await;
    backend.respond(
        "GET",
        "/api/categories",
        200,
        envelope(json!({ "categories": [
            { "_id": "main", "name": "Lighting" },
            { "_id": "sub", "name": "Lamps", "parentCategory": { "_id": "main", "name": "Lighting" } }
        ] })),
    );
    backend.respond(
        "DELETE",
        "/api/categories/main",
        409,
        json!({ "message": "Category has products" }),
    );

    let (api, _) = backend.logged_in_api();
    let mut view = CategoriesView::new(api, NoticeDurations::default());
    view.load().await.unwrap();

    let prompt = std::sync::Mutex::new(String::new());
    let confirm = |p: &str| {
        prompt.lock().unwrap().push_str(p);
        true
    };
    let err = view
        .delete(&CategoryId::new("main"), &confirm)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Api(_)));
    assert_eq!(view.categories().len(), 2);
    assert_eq!(view.latest_notice().unwrap().message, "Category has products");
    assert!(prompt.lock().unwrap().contains("1 sub-categories"));
}

#[tokio::test]
async fn test_announcement_dates_validated_before_send() {
    let backend = MockBackend::start().await;
    let (api, _) = backend.logged_in_api();
    let mut view = AnnouncementsView::new(api, NoticeDurations::default());

    let start = Utc::now();
    let draft = AnnouncementDraft {
        title: "Sale".to_string(),
        content: "All lamps 10% off".to_string(),
        start_date: Some(start),
        end_date: Some(start - Duration::hours(1)),
        ..AnnouncementDraft::default()
    };
    let err = view.create(&draft).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::EndBeforeStart)
    ));
    assert!(backend.requests().is_empty());
}
