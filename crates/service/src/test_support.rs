#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = configs::DatabaseConfig::from_env();

    MIGRATED
        .get_or_init(|| async {
            let db = models::db::connect(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Fresh connection for the current test's runtime.
    let cfg = configs::DatabaseConfig::from_env();
    let db = models::db::connect(&cfg).await?;
    Ok(db)
}
