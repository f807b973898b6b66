use utoipa::OpenApi;

use crate::routes;
use crate::routes::orders::{CreateOrderRequest, OrderResponse, UpdateOrderRequest};
use crate::routes::products::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::routes::users::{CreateUserRequest, UpdateUserRequest, UserResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        description = "CRUD API over users, products and orders"
    ),
    paths(
        routes::health,
        routes::users::list_users,
        routes::users::get_user,
        routes::users::create_user,
        routes::users::update_user,
        routes::users::delete_user,
        routes::products::list_products,
        routes::products::get_product,
        routes::products::create_product,
        routes::products::update_product,
        routes::products::delete_product,
        routes::orders::list_orders,
        routes::orders::get_order,
        routes::orders::create_order,
        routes::orders::update_order,
        routes::orders::delete_order,
    ),
    components(schemas(
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        ProductResponse,
        CreateProductRequest,
        UpdateProductRequest,
        OrderResponse,
        CreateOrderRequest,
        UpdateOrderRequest,
    )),
    tags(
        (name = "users", description = "User management"),
        (name = "products", description = "Product catalog"),
        (name = "orders", description = "Order management")
    )
)]
pub struct ApiDoc;
