use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use configs::{AppConfig, ServerConfig};
use migration::MigratorTrait;
use service::order::repository::SeaOrmOrderRepository;
use service::order::service::OrderService;
use service::product::repository::SeaOrmProductRepository;
use service::product::service::ProductService;
use service::user::repository::SeaOrmUserRepository;
use service::user::service::UserService;
use tracing::info;

use crate::graphql;
use crate::routes::{self, ServerState};

/// Load configuration, connect to the database, run migrations and
/// wire the repository/service graph.
async fn prepare() -> anyhow::Result<(AppConfig, ServerState)> {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_default();

    let cfg = AppConfig::load()?;
    let db = models::db::connect(&cfg.database).await.context("connecting to database")?;
    migration::Migrator::up(&db, None).await.context("running migrations")?;

    let state = ServerState {
        users: Arc::new(UserService::new(Arc::new(SeaOrmUserRepository { db: db.clone() }))),
        products: Arc::new(ProductService::new(Arc::new(SeaOrmProductRepository {
            db: db.clone(),
        }))),
        orders: Arc::new(OrderService::new(Arc::new(SeaOrmOrderRepository { db }))),
    };
    Ok((cfg, state))
}

async fn serve(app: Router, server: &ServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, environment = %server.environment, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Entry point for the REST binary.
pub async fn run() -> anyhow::Result<()> {
    let (cfg, state) = prepare().await?;
    let app = routes::build_router(state, cfg.server.enable_swagger);
    serve(app, &cfg.server).await
}

/// Entry point for the GraphQL binary. The playground is served
/// everywhere except production.
pub async fn run_graphql() -> anyhow::Result<()> {
    let (cfg, state) = prepare().await?;
    let app = graphql::build_router(state, !cfg.server.is_production());
    serve(app, &cfg.server).await
}
