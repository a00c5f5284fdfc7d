//! SQLite connector built on sqlx
//!
//! Provides pool construction from environment configuration, retry-aware
//! connection, an in-memory pool for tests, and a ping health check.

use std::str::FromStr;
use std::time::Duration;

use core_config::{env_or_default, ConfigError, FromEnv};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::common::{retry_with_backoff, DatabaseError, DatabaseResult, RetryConfig};

/// SQLite connection configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Connection URL, e.g. `sqlite://inventory.db`
    pub url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// How long a statement waits on a locked database before failing
    pub busy_timeout_secs: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://inventory.db".to_string(),
            max_connections: 5,
            busy_timeout_secs: 5,
        }
    }
}

impl FromEnv for SqliteConfig {
    /// Load configuration from environment variables:
    /// - `DATABASE_URL` (default: `sqlite://inventory.db`)
    /// - `DATABASE_MAX_CONNECTIONS` (default: 5)
    /// - `DATABASE_BUSY_TIMEOUT_SECS` (default: 5)
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_connections = env_or_default(
            "DATABASE_MAX_CONNECTIONS",
            &defaults.max_connections.to_string(),
        )
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::ParseError {
            key: "DATABASE_MAX_CONNECTIONS".to_string(),
            details: e.to_string(),
        })?;

        let busy_timeout_secs = env_or_default(
            "DATABASE_BUSY_TIMEOUT_SECS",
            &defaults.busy_timeout_secs.to_string(),
        )
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::ParseError {
            key: "DATABASE_BUSY_TIMEOUT_SECS".to_string(),
            details: e.to_string(),
        })?;

        Ok(Self {
            url: env_or_default("DATABASE_URL", &defaults.url),
            max_connections,
            busy_timeout_secs,
        })
    }
}

impl SqliteConfig {
    /// Build connect options from the URL, creating the database file if it
    /// does not exist and enabling WAL mode plus foreign key enforcement.
    fn connect_options(&self) -> DatabaseResult<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(&self.url)
            .map_err(|e| DatabaseError::ConfigError(format!("invalid DATABASE_URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(self.busy_timeout_secs));

        Ok(options)
    }
}

/// Connect using configuration loaded from the environment
pub async fn connect() -> DatabaseResult<SqlitePool> {
    let config = SqliteConfig::from_env()
        .map_err(|e| DatabaseError::ConfigError(e.to_string()))?;
    connect_from_config(&config).await
}

/// Connect with an explicit configuration
pub async fn connect_from_config(config: &SqliteConfig) -> DatabaseResult<SqlitePool> {
    debug!("Connecting to SQLite at {}", config.url);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(config.connect_options()?)
        .await?;

    info!("SQLite pool established ({})", config.url);
    Ok(pool)
}

/// Connect with retry and exponential backoff.
///
/// Uses the default [`RetryConfig`] (3 attempts) unless one is provided.
pub async fn connect_with_retry(
    config: &SqliteConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<SqlitePool> {
    let retry_config = retry_config.unwrap_or_default();

    retry_with_backoff(|| connect_from_config(config), retry_config)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Open an isolated in-memory database.
///
/// A single connection is required: every connection to `sqlite::memory:`
/// gets its own database, so a larger pool would scatter state. Idle
/// reaping is disabled for the same reason.
pub async fn connect_in_memory() -> DatabaseResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(DatabaseError::Sqlite)?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Health check: round-trip a trivial query through the pool
pub async fn ping(pool: &SqlitePool) -> DatabaseResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;
    Ok(())
}
