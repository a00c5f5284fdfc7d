//! Product service - business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    NewProduct, Pagination, Product, ProductPage, ProductPatch, ProductQuery, StockChange,
};
use crate::repository::ProductRepository;
use crate::transfer::{self, ImportRowError, ImportSummary};

/// Product service providing business logic operations
///
/// The service layer handles validation, business rules, and orchestrates
/// repository operations.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: NewProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if self.repository.exists_by_name(&input.name, None).await? {
            return Err(ProductError::DuplicateName(input.name.clone()));
        }

        self.repository.create(input).await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// List products with filtering, sorting, and pagination
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> ProductResult<ProductPage> {
        query
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let total = self.repository.count(&query).await?;
        let pagination = Pagination::new(query.page(), query.limit(), total);
        let products = self.repository.list(query).await?;

        Ok(ProductPage {
            products,
            pagination,
        })
    }

    /// Search products by name substring
    #[instrument(skip(self))]
    pub async fn search_products(&self, term: &str) -> ProductResult<Vec<Product>> {
        if term.is_empty() {
            return Err(ProductError::Validation(
                "Name query parameter is required".to_string(),
            ));
        }

        self.repository.search_by_name(term).await
    }

    /// Apply a partial update to a product.
    ///
    /// When the update changes the stock value, a stock change record is
    /// written with the caller's user agent.
    #[instrument(skip(self, patch), fields(product_id = id))]
    pub async fn update_product(
        &self,
        id: i64,
        patch: ProductPatch,
        user_info: &str,
    ) -> ProductResult<Product> {
        patch
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if patch.is_empty() {
            return Err(ProductError::Validation("No fields to update".to_string()));
        }

        let mut product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if let Some(ref new_name) = patch.name {
            if new_name != &product.name
                && self.repository.exists_by_name(new_name, Some(id)).await?
            {
                return Err(ProductError::DuplicateName(new_name.clone()));
            }
        }

        let old_stock = product.stock;
        product.apply_patch(patch);
        self.repository.update(&product).await?;

        if product.stock != old_stock {
            self.repository
                .record_stock_change(id, old_stock, product.stock, user_info)
                .await?;
        }

        Ok(product)
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    /// Stock change log for a product, most recent first.
    ///
    /// An unknown product yields an empty log rather than an error.
    #[instrument(skip(self))]
    pub async fn product_history(&self, id: i64) -> ProductResult<Vec<StockChange>> {
        self.repository.history(id).await
    }

    /// Distinct non-empty category names in use
    #[instrument(skip(self))]
    pub async fn categories(&self) -> ProductResult<Vec<String>> {
        self.repository.categories().await
    }

    /// Import products from CSV bytes.
    ///
    /// Rows are processed in file order. A row with an empty name is
    /// recorded as an error; a row whose name is already taken is skipped
    /// without an error entry. A failed duplicate check or insert is
    /// recorded against its row number. The import never aborts part-way.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn import_csv(&self, data: &[u8]) -> ProductResult<ImportSummary> {
        let rows = transfer::parse_rows(data)?;
        if rows.is_empty() {
            return Err(ProductError::EmptyFile);
        }

        let mut added = 0;
        let mut skipped = 0;
        let mut errors = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            let row_number = index + 1;

            if row.name.is_empty() {
                errors.push(ImportRowError {
                    row: row_number,
                    error: "Missing product name".to_string(),
                });
                skipped += 1;
                continue;
            }

            match self.repository.exists_by_name(&row.name, None).await {
                Ok(true) => {
                    skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    errors.push(ImportRowError {
                        row: row_number,
                        error: e.to_string(),
                    });
                    skipped += 1;
                    continue;
                }
            }

            match self.repository.create(row.into()).await {
                Ok(_) => added += 1,
                Err(e) => {
                    errors.push(ImportRowError {
                        row: row_number,
                        error: e.to_string(),
                    });
                    skipped += 1;
                }
            }
        }

        Ok(ImportSummary::new(added, skipped, errors))
    }

    /// Export every product as CSV
    #[instrument(skip(self))]
    pub async fn export_csv(&self) -> ProductResult<String> {
        let products = self.repository.all().await?;
        Ok(transfer::export_csv(&products))
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
