use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use service::order::service::OrderService;
use service::product::service::ProductService;
use service::user::service::UserService;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;

pub mod orders;
pub mod products;
pub mod users;

/// Shared handler state: one service per resource, each behind an `Arc`
/// so the router can be cloned per connection.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserService>,
    pub products: Arc<ProductService>,
    pub orders: Arc<OrderService>,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<common::types::Health> {
    Json(common::types::Health { status: "ok" })
}

/// Assemble the REST application: versioned resource routes, the health
/// probe, CORS and request tracing, plus Swagger UI when enabled.
pub fn build_router(state: ServerState, enable_swagger: bool) -> Router {
    let api = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/orders/:id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .with_state(state);

    let mut app = Router::new().route("/health", get(health)).nest("/api/v1", api);

    if enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app.layer(CorsLayer::very_permissive()).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
