use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid database name: {0}")]
    InvalidDatabaseName(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Lazily-built connection pool for the registry database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Database used when `REGISTRY_DB_NAME` is not set and the URL has no path
    const DEFAULT_DB_NAME: &'static str = "barangay_registry";

    fn cell() -> &'static OnceCell<PgPool> {
        static POOL: OnceCell<PgPool> = OnceCell::const_new();
        &POOL
    }

    /// Shared pool, created on first use
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let pool = Self::cell()
            .get_or_try_init(|| async {
                let connection_string = Self::build_connection_string()?;
                let db = &config::config().database;
                let pool = PgPoolOptions::new()
                    .max_connections(db.max_connections)
                    .acquire_timeout(Duration::from_secs(db.connection_timeout))
                    .connect(&connection_string)
                    .await?;
                info!("Created database pool (max_connections={})", db.max_connections);
                Ok::<_, DatabaseError>(pool)
            })
            .await?;
        Ok(pool.clone())
    }

    /// `DATABASE_URL`, with its path replaced by `REGISTRY_DB_NAME` when that is set
    fn build_connection_string() -> Result<String, DatabaseError> {
        let base = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let override_name = std::env::var("REGISTRY_DB_NAME").ok();
        Self::connection_string_for(&base, override_name.as_deref())
    }

    fn connection_string_for(base: &str, database_name: Option<&str>) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let current = url.path().trim_start_matches('/').to_string();
        let name = match database_name {
            Some(name) => name.to_string(),
            None if current.is_empty() => Self::DEFAULT_DB_NAME.to_string(),
            None => return Ok(url.into()),
        };

        if !Self::is_valid_db_name(&name) {
            return Err(DatabaseError::InvalidDatabaseName(name));
        }
        url.set_path(&format!("/{}", name));
        Ok(url.into())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        if let Some(pool) = Self::cell().get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }

    /// Database names are restricted to [a-zA-Z0-9_] to keep them safe in a URL path
    fn is_valid_db_name(name: &str) -> bool {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
