use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors from the record store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Migration(#[from] MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection pool lifecycle for the todo database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the process-wide pool
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    /// Apply embedded migrations from `migrations/`
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        MIGRATOR.run(pool).await?;
        info!("Applied {} database migration(s)", MIGRATOR.iter().count());
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    pub async fn close(pool: PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}
