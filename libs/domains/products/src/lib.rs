//! Products Domain
//!
//! This module provides a complete domain implementation for managing an
//! inventory of products backed by SQLite.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + SQLite implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     sqlite::SqliteProductRepository,
//!     service::ProductService,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Connect and prepare the schema
//! let pool = database::sqlite::connect().await?;
//! SqliteProductRepository::init_schema(&pool).await?;
//!
//! // Create a repository and service
//! let repository = SqliteProductRepository::new(pool);
//! let service = ProductService::new(repository);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod sqlite;
pub mod transfer;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    CategoryList, DeleteConfirmation, NewProduct, Pagination, Product, ProductList, ProductPage,
    ProductPatch, ProductQuery, SortField, SortOrder, StockChange, StockHistory,
};
pub use repository::ProductRepository;
pub use service::ProductService;
pub use sqlite::SqliteProductRepository;
pub use transfer::{ImportRowError, ImportSummary};
