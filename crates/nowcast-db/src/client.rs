//! Database client and connection management

use crate::schema::{CREATE_WEATHER_RECORD, DROP_WEATHER_RECORD};
use crate::{DbError, DbResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Database client wrapping sqlx connection pool
///
/// Cloning is cheap; every query checks out its own connection.
#[derive(Clone)]
pub struct DbClient {
    pool: SqlitePool,
}

impl DbClient {
    /// Create a new database client from connection string
    ///
    /// The database file is created when missing.
    pub async fn new(database_url: &str) -> DbResult<Self> {
        if !database_url.starts_with("sqlite:") {
            return Err(DbError::ConfigError(format!(
                "unsupported database url: {database_url}"
            )));
        }

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| DbError::ConfigError(format!("invalid database url: {e}")))?
            .create_if_missing(true);

        Self::with_options(opts).await
    }

    /// Create a new database client with custom options
    pub async fn with_options(opts: SqliteConnectOptions) -> DbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(opts)
            .await?;

        Ok(Self { pool })
    }

    /// Private in-memory database, kept alive on a single connection
    pub async fn in_memory() -> DbResult<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;

        Ok(Self { pool })
    }

    /// Get reference to underlying pool for direct queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Test the database connection
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Drop and recreate the record table
    #[instrument(skip(self))]
    pub async fn reset_schema(&self) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(DROP_WEATHER_RECORD).execute(&mut *tx).await?;
        sqlx::query(CREATE_WEATHER_RECORD).execute(&mut *tx).await?;
        tx.commit().await?;

        info!("Weather record table recreated");
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(self) {
        self.pool.close().await;
    }
}
