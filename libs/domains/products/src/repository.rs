use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{NewProduct, Product, ProductQuery, StockChange};

/// Repository trait for product persistence
///
/// This trait defines the data access interface for products and their
/// stock change log. The SQLite implementation lives in [`crate::sqlite`];
/// tests mock it to exercise the service layer in isolation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product and return the stored row
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// List products matching the query's filters, sorted and paginated
    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>>;

    /// Count products matching the query's filters (ignores pagination)
    async fn count(&self, query: &ProductQuery) -> ProductResult<i64>;

    /// Find products whose name contains the given term
    async fn search_by_name(&self, term: &str) -> ProductResult<Vec<Product>>;

    /// Write a full product row back to storage
    async fn update(&self, product: &Product) -> ProductResult<()>;

    /// Delete a product by ID, returning whether a row was removed
    async fn delete(&self, id: i64) -> ProductResult<bool>;

    /// Check whether a name is taken, optionally ignoring one product
    async fn exists_by_name(&self, name: &str, exclude_id: Option<i64>) -> ProductResult<bool>;

    /// Fetch every product, ordered by ID
    async fn all(&self) -> ProductResult<Vec<Product>>;

    /// Distinct non-empty category names
    async fn categories(&self) -> ProductResult<Vec<String>>;

    /// Append a stock change record for a product
    async fn record_stock_change(
        &self,
        product_id: i64,
        old_quantity: i64,
        new_quantity: i64,
        user_info: &str,
    ) -> ProductResult<()>;

    /// Stock change records for a product, most recent first
    async fn history(&self, product_id: i64) -> ProductResult<Vec<StockChange>>;
}
