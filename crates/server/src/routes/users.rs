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
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<domain::User> for UserResponse {
    fn from(u: domain::User) -> Self {
        Self { id: u.id, name: u.name, email: u.email }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Update bodies tolerate missing fields; absent ones overwrite with
/// their zero value, same as create-shaped bodies on other stacks.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

fn validate(name: &str, email: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("email must be a valid address"));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses((status = 200, description = "All users", body = [UserResponse]))
)]
pub async fn list_users(
    State(state): State<ServerState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state
        .users
        .get_users()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .get_user(&id)
        .await
        .map_err(|_| ApiError::not_found("user"))?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created user", body = UserResponse),
        (status = 400, description = "Malformed or invalid body")
    )
)]
pub async fn create_user(
    State(state): State<ServerState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    validate(&req.name, &req.email)?;
    let user = state
        .users
        .create_user(&req.name, &req.email)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Malformed body")
    )
)]
pub async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let user = state
        .users
        .update_user(&id, &req.name, &req.email)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses((status = 204, description = "User deleted"))
)]
pub async fn delete_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .users
        .delete_user(&id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
