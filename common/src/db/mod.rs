use sqlx::migrate::Migrator;
use sqlx::{postgres::PgPoolOptions, PgPool, Pool, Postgres};
use tracing::info;

use crate::error::Result;

/// Database pool type
pub type DbPool = Pool<Postgres>;

/// Schema migrations, embedded from the workspace `migrations/` directory at build time
pub static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Initialize the database connection pool
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!("Connected to PostgreSQL database with pool size: {}", max_connections);
    Ok(pool)
}

/// Run migrations on the database
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR.run(pool).await?;

    info!("Database migrations applied");
    Ok(())
}
