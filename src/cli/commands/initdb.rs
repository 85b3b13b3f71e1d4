use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::info;

pub async fn init_database(database_url: &str) -> Result<()> {
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("failed to connect to {}", database_url))?;

    info!("Applying migrations to {}", database_url);
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    info!("Database ready");
    Ok(())
}
