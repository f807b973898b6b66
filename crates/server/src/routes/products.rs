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
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

impl From<domain::Product> for ProductResponse {
    fn from(p: domain::Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

fn validate(name: &str, price: f64, stock: i32) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    if price <= 0.0 {
        return Err(ApiError::bad_request("price must be greater than zero"));
    }
    if stock < 0 {
        return Err(ApiError::bad_request("stock must not be negative"));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    responses((status = 200, description = "All products", body = [ProductResponse]))
)]
pub async fn list_products(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state
        .products
        .get_products()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "No such product")
    )
)]
pub async fn get_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .products
        .get_product(&id)
        .await
        .map_err(|_| ApiError::not_found("product"))?;
    Ok(Json(product.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Created product", body = ProductResponse),
        (status = 400, description = "Malformed or invalid body")
    )
)]
pub async fn create_product(
    State(state): State<ServerState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    validate(&req.name, req.price, req.stock)?;
    let product = state
        .products
        .create_product(&req.name, &req.description, req.price, req.stock)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 400, description = "Malformed body")
    )
)]
pub async fn update_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let product = state
        .products
        .update_product(&id, &req.name, &req.description, req.price, req.stock)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(product.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    responses((status = 204, description = "Product deleted"))
)]
pub async fn delete_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .products
        .delete_product(&id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
