use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql::{
    Context, EmptySubscription, InputObject, Object, Schema, ServerError, SimpleObject, Variables,
};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{
    extract::{Query, State},
    Json, Router,
};
use serde::Deserialize;
use service::domain;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes::{health, ServerState};

pub type ShopSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(SimpleObject)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<domain::User> for User {
    fn from(u: domain::User) -> Self {
        Self { id: u.id, name: u.name, email: u.email }
    }
}

#[derive(SimpleObject)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

impl From<domain::Product> for Product {
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

#[derive(SimpleObject)]
pub struct Order {
    pub id: String,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: f64,
    pub status: String,
}

impl From<domain::Order> for Order {
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

#[derive(InputObject)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
}

#[derive(InputObject)]
pub struct UpdateUserInput {
    #[graphql(default)]
    pub name: String,
    #[graphql(default)]
    pub email: String,
}

#[derive(InputObject)]
pub struct CreateProductInput {
    pub name: String,
    #[graphql(default)]
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

#[derive(InputObject)]
pub struct UpdateProductInput {
    #[graphql(default)]
    pub name: String,
    #[graphql(default)]
    pub description: String,
    #[graphql(default)]
    pub price: f64,
    #[graphql(default)]
    pub stock: i32,
}

#[derive(InputObject)]
pub struct CreateOrderInput {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: f64,
    #[graphql(default)]
    pub status: String,
}

/// User and product references are accepted for shape symmetry but an
/// order cannot be moved to a different user or product after the fact.
#[derive(InputObject)]
pub struct UpdateOrderInput {
    #[graphql(default)]
    pub user_id: i32,
    #[graphql(default)]
    pub product_id: i32,
    #[graphql(default)]
    pub quantity: i32,
    #[graphql(default)]
    pub total_price: f64,
    #[graphql(default)]
    pub status: String,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<User>> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state.users.get_users().await?.into_iter().map(Into::into).collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<User> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state.users.get_user(&id).await?.into())
    }

    async fn products(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Product>> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state.products.get_products().await?.into_iter().map(Into::into).collect())
    }

    async fn product(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Product> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state.products.get_product(&id).await?.into())
    }

    async fn orders(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Order>> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state.orders.get_orders().await?.into_iter().map(Into::into).collect())
    }

    async fn order(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Order> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state.orders.get_order(&id).await?.into())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        input: CreateUserInput,
    ) -> async_graphql::Result<User> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state.users.create_user(&input.name, &input.email).await?.into())
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateUserInput,
    ) -> async_graphql::Result<User> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state.users.update_user(&id, &input.name, &input.email).await?.into())
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        let state = ctx.data_unchecked::<ServerState>();
        state.users.delete_user(&id).await?;
        Ok(true)
    }

    async fn create_product(
        &self,
        ctx: &Context<'_>,
        input: CreateProductInput,
    ) -> async_graphql::Result<Product> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state
            .products
            .create_product(&input.name, &input.description, input.price, input.stock)
            .await?
            .into())
    }

    async fn update_product(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateProductInput,
    ) -> async_graphql::Result<Product> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state
            .products
            .update_product(&id, &input.name, &input.description, input.price, input.stock)
            .await?
            .into())
    }

    async fn delete_product(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        let state = ctx.data_unchecked::<ServerState>();
        state.products.delete_product(&id).await?;
        Ok(true)
    }

    async fn create_order(
        &self,
        ctx: &Context<'_>,
        input: CreateOrderInput,
    ) -> async_graphql::Result<Order> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state
            .orders
            .create_order(
                input.user_id,
                input.product_id,
                input.quantity,
                input.total_price,
                &input.status,
            )
            .await?
            .into())
    }

    async fn update_order(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateOrderInput,
    ) -> async_graphql::Result<Order> {
        let state = ctx.data_unchecked::<ServerState>();
        Ok(state
            .orders
            .update_order(
                &id,
                input.user_id,
                input.product_id,
                input.quantity,
                input.total_price,
                &input.status,
            )
            .await?
            .into())
    }

    async fn delete_order(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        let state = ctx.data_unchecked::<ServerState>();
        state.orders.delete_order(&id).await?;
        Ok(true)
    }
}

pub fn build_schema(state: ServerState) -> ShopSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

/// Plain axum transport for the schema; the GraphQL request and
/// response types are ordinary serde values.
pub async fn graphql_handler(
    State(schema): State<ShopSchema>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(schema.execute(request).await)
}

/// GET transport: the query travels in the query string, with
/// `variables` as a JSON-encoded parameter.
#[derive(Debug, Deserialize)]
pub struct GraphQLQueryParams {
    pub query: String,
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,
    pub variables: Option<String>,
}

pub async fn graphql_get_handler(
    State(schema): State<ShopSchema>,
    Query(params): Query<GraphQLQueryParams>,
) -> Json<async_graphql::Response> {
    let mut request = async_graphql::Request::new(params.query);
    if let Some(op) = params.operation_name {
        request = request.operation_name(op);
    }
    if let Some(raw) = params.variables {
        match serde_json::from_str(&raw) {
            Ok(json) => request = request.variables(Variables::from_json(json)),
            Err(e) => {
                return Json(async_graphql::Response::from_errors(vec![ServerError::new(
                    format!("invalid variables: {e}"),
                    None,
                )]))
            }
        }
    }
    Json(schema.execute(request).await)
}

pub async fn playground() -> Html<String> {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

/// Assemble the GraphQL application: a single /graphql endpoint, the
/// health probe, and the playground outside production.
pub fn build_router(state: ServerState, enable_playground: bool) -> Router {
    let schema = build_schema(state);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/graphql", get(graphql_get_handler).post(graphql_handler))
        .with_state(schema);

    if enable_playground {
        app = app.route("/playground", get(playground));
    }

    app.layer(CorsLayer::very_permissive()).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
