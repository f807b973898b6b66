use std::sync::Arc;

use serde_json::{json, Value};
use server::routes::{build_router, ServerState};
use service::order::repository::memory::InMemoryOrderRepository;
use service::order::service::OrderService;
use service::product::repository::memory::InMemoryProductRepository;
use service::product::service::ProductService;
use service::user::repository::memory::InMemoryUserRepository;
use service::user::service::UserService;

fn memory_state() -> ServerState {
    ServerState {
        users: Arc::new(UserService::new(Arc::new(InMemoryUserRepository::default()))),
        products: Arc::new(ProductService::new(Arc::new(InMemoryProductRepository::default()))),
        orders: Arc::new(OrderService::new(Arc::new(InMemoryOrderRepository::default()))),
    }
}

async fn spawn_app(enable_swagger: bool) -> String {
    let app = build_router(memory_state(), enable_swagger);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_reports_ok() {
    let base = spawn_app(false).await;
    let res = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn create_user_returns_201_with_stringified_id() {
    let base = spawn_app(false).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/api/v1/users"))
        .json(&json!({"name": "John Doe", "email": "john@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({"id": "1", "name": "John Doe", "email": "john@example.com"})
    );
}

#[tokio::test]
async fn list_starts_empty() {
    let base = spawn_app(false).await;
    let res = reqwest::get(format!("{base}/api/v1/users")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn missing_resource_maps_to_fixed_404() {
    let base = spawn_app(false).await;
    let res = reqwest::get(format!("{base}/api/v1/products/999")).await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "product not found"}));

    // A non-numeric id on a read collapses into the same 404.
    let res = reqwest::get(format!("{base}/api/v1/users/abc")).await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "user not found"}));
}

#[tokio::test]
async fn malformed_create_body_is_400() {
    let base = spawn_app(false).await;
    let client = reqwest::Client::new();

    // Not JSON at all.
    let res = client
        .post(format!("{base}/api/v1/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert!(body.get("error").is_some());

    // Missing required field.
    let res = client
        .post(format!("{base}/api/v1/users"))
        .json(&json!({"name": "No Email"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn create_validation_rejects_bad_values() {
    let base = spawn_app(false).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/api/v1/users"))
        .json(&json!({"name": "John", "email": "not-an-email"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client
        .post(format!("{base}/api/v1/products"))
        .json(&json!({"name": "Laptop", "description": "x", "price": 0.0, "stock": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client
        .post(format!("{base}/api/v1/orders"))
        .json(&json!({"user_id": 0, "product_id": 1, "quantity": 1, "total_price": 10.0}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn non_numeric_id_on_write_is_500_with_verbatim_error() {
    let base = spawn_app(false).await;
    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{base}/api/v1/users/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    let msg = body["error"].as_str().unwrap();
    assert!(msg.starts_with("invalid id:"), "got {msg}");

    let res = client
        .put(format!("{base}/api/v1/products/abc"))
        .json(&json!({"name": "x", "description": "", "price": 1.0, "stock": 0}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
}

#[tokio::test]
async fn product_crud_round_trip() {
    let base = spawn_app(false).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/api/v1/products"))
        .json(&json!({"name": "Laptop", "description": "Gaming laptop", "price": 25000.50, "stock": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["id"], "1");
    assert_eq!(created["price"], 25000.50);

    let res = client
        .put(format!("{base}/api/v1/products/1"))
        .json(&json!({"name": "Laptop Pro", "description": "Upgraded", "price": 30000.00, "stock": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["name"], "Laptop Pro");
    assert_eq!(updated["stock"], 5);

    let res = client
        .delete(format!("{base}/api/v1/products/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    let res = reqwest::get(format!("{base}/api/v1/products/1")).await.unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn order_defaults_and_update_narrowing() {
    let base = spawn_app(false).await;
    let client = reqwest::Client::new();

    // Status omitted: the service substitutes "pending".
    let res = client
        .post(format!("{base}/api/v1/orders"))
        .json(&json!({"user_id": 1, "product_id": 1, "quantity": 2, "total_price": 50000.00}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["status"], "pending");
    assert_eq!(created["user_id"], 1);

    // The update body may name a different user and product but the
    // stored references survive.
    let res = client
        .put(format!("{base}/api/v1/orders/1"))
        .json(&json!({
            "user_id": 9,
            "product_id": 9,
            "quantity": 3,
            "total_price": 75000.00,
            "status": "completed"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["user_id"], 1);
    assert_eq!(updated["product_id"], 1);
    assert_eq!(updated["quantity"], 3);
    assert_eq!(updated["total_price"], 75000.00);
    assert_eq!(updated["status"], "completed");
}

#[tokio::test]
async fn delete_is_not_idempotent() {
    let base = spawn_app(false).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/api/v1/users"))
        .json(&json!({"name": "John", "email": "john@example.com"}))
        .send()
        .await
        .unwrap();

    let res = client
        .delete(format!("{base}/api/v1/users/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    let res = client
        .delete(format!("{base}/api/v1/users/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "database error: user 1 not found"}));
}

#[tokio::test]
async fn swagger_document_follows_the_toggle() {
    let enabled = spawn_app(true).await;
    let res = reqwest::get(format!("{enabled}/api-docs/openapi.json")).await.unwrap();
    assert_eq!(res.status(), 200);
    let doc: Value = res.json().await.unwrap();
    assert!(doc["paths"].get("/api/v1/users").is_some());

    let disabled = spawn_app(false).await;
    let res = reqwest::get(format!("{disabled}/api-docs/openapi.json")).await.unwrap();
    assert_eq!(res.status(), 404);
}
