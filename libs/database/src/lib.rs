//! Database library providing the SQLite connector and shared connection utilities
//!
//! # Examples
//!
//! ```ignore
//! use database::sqlite::{self, SqliteConfig};
//! use core_config::FromEnv;
//!
//! let config = SqliteConfig::from_env()?;
//! let pool = sqlite::connect_with_retry(&config, None).await?;
//! sqlite::ping(&pool).await?;
//! ```

pub mod common;
pub mod sqlite;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
pub use sqlite::SqliteConfig;
