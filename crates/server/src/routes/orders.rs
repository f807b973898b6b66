use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use service::domain;
use utoipa::ToSchema;

use crate::errors::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: f64,
    pub status: String,
}

impl From<domain::Order> for OrderResponse {
    fn from(o: domain::Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            product_id: o.product_id,
            quantity: o.quantity,
            total_price: o.total_price,
            status: o.status,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: f64,
    #[serde(default)]
    pub status: String,
}

/// Same shape as create for symmetry; the referenced user and product
/// are not reassignable, so those two fields never reach the store.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateOrderRequest {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: f64,
    pub status: String,
}

fn validate(user_id: i32, product_id: i32, quantity: i32, total_price: f64) -> Result<(), ApiError> {
    if user_id < 1 || product_id < 1 {
        return Err(ApiError::bad_request("user_id and product_id must be positive"));
    }
    if quantity <= 0 {
        return Err(ApiError::bad_request("quantity must be greater than zero"));
    }
    if total_price <= 0.0 {
        return Err(ApiError::bad_request("total_price must be greater than zero"));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "orders",
    responses((status = 200, description = "All orders", body = [OrderResponse]))
)]
pub async fn list_orders(
    State(state): State<ServerState>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state
        .orders
        .get_orders()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = OrderResponse),
        (status = 404, description = "No such order")
    )
)]
pub async fn get_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .orders
        .get_order(&id)
        .await
        .map_err(|_| ApiError::not_found("order"))?;
    Ok(Json(order.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Created order", body = OrderResponse),
        (status = 400, description = "Malformed or invalid body")
    )
)]
pub async fn create_order(
    State(state): State<ServerState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    validate(req.user_id, req.product_id, req.quantity, req.total_price)?;
    let order = state
        .orders
        .create_order(req.user_id, req.product_id, req.quantity, req.total_price, &req.status)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 400, description = "Malformed body")
    )
)]
pub async fn update_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let order = state
        .orders
        .update_order(
            &id,
            req.user_id,
            req.product_id,
            req.quantity,
            req.total_price,
            &req.status,
        )
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(order.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order id")),
    responses((status = 204, description = "Order deleted"))
)]
pub async fn delete_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .orders
        .delete_order(&id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
