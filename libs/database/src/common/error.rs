/// Unified error type for database connection and health operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// SQLite driver errors (sqlx)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
