//! SQLite implementation of ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, ProductQuery, StockChange};
use crate::repository::ProductRepository;

/// SQLite implementation of the ProductRepository
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    /// Create a new SqliteProductRepository backed by the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the products and inventory_history tables if they do not exist
    pub async fn init_schema(pool: &SqlitePool) -> ProductResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                name     TEXT NOT NULL UNIQUE,
                unit     TEXT,
                category TEXT,
                brand    TEXT,
                stock    INTEGER NOT NULL DEFAULT 0,
                status   TEXT,
                image    TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory_history (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id   INTEGER NOT NULL,
                old_quantity INTEGER NOT NULL,
                new_quantity INTEGER NOT NULL,
                change_date  TEXT NOT NULL,
                user_info    TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_inventory_history_product
             ON inventory_history (product_id, change_date)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    fn map_insert_error(e: sqlx::Error, name: &str) -> ProductError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return ProductError::DuplicateName(name.to_string());
            }
        }
        ProductError::Database(e)
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let result = sqlx::query(
            "INSERT INTO products (name, unit, category, brand, stock, status, image)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.unit)
        .bind(&input.category)
        .bind(&input.brand)
        .bind(input.stock)
        .bind(&input.status)
        .bind(&input.image)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(e, &input.name))?;

        let id = result.last_insert_rowid();

        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        let mut builder = QueryBuilder::new("SELECT * FROM products WHERE 1=1");

        if let Some(ref category) = query.category {
            builder.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(ref name) = query.name {
            builder
                .push(" AND name LIKE ")
                .push_bind(format!("%{}%", name));
        }

        // Sort column and direction come from fixed enums, never user text
        let column = query.sort.map(|s| s.column()).unwrap_or("id");
        builder.push(format!(" ORDER BY {} {}", column, query.order().keyword()));

        builder
            .push(" LIMIT ")
            .push_bind(i64::from(query.limit()))
            .push(" OFFSET ")
            .push_bind(query.offset());

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn count(&self, query: &ProductQuery) -> ProductResult<i64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM products WHERE 1=1");

        if let Some(ref category) = query.category {
            builder.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(ref name) = query.name {
            builder
                .push(" AND name LIKE ")
                .push_bind(format!("%{}%", name));
        }

        let (total,): (i64,) = builder.build_query_as().fetch_one(&self.pool).await?;

        Ok(total)
    }

    #[instrument(skip(self))]
    async fn search_by_name(&self, term: &str) -> ProductResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE name LIKE ?")
            .bind(format!("%{}%", term))
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    #[instrument(skip(self, product), fields(product_id = product.id))]
    async fn update(&self, product: &Product) -> ProductResult<()> {
        let result = sqlx::query(
            "UPDATE products
             SET name = ?, unit = ?, category = ?, brand = ?, stock = ?, status = ?, image = ?
             WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.unit)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(product.stock)
        .bind(&product.status)
        .bind(&product.image)
        .bind(product.id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(e, &product.name))?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound(product.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> ProductResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn exists_by_name(&self, name: &str, exclude_id: Option<i64>) -> ProductResult<bool> {
        let existing: Option<(i64,)> = match exclude_id {
            Some(id) => {
                sqlx::query_as("SELECT id FROM products WHERE name = ? AND id != ?")
                    .bind(name)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT id FROM products WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(existing.is_some())
    }

    #[instrument(skip(self))]
    async fn all(&self) -> ProductResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> ProductResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM products
             WHERE category IS NOT NULL AND category != ''
             ORDER BY category ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    #[instrument(skip(self))]
    async fn record_stock_change(
        &self,
        product_id: i64,
        old_quantity: i64,
        new_quantity: i64,
        user_info: &str,
    ) -> ProductResult<()> {
        sqlx::query(
            "INSERT INTO inventory_history (product_id, old_quantity, new_quantity, change_date, user_info)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product_id)
        .bind(old_quantity)
        .bind(new_quantity)
        .bind(Utc::now())
        .bind(user_info)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn history(&self, product_id: i64) -> ProductResult<Vec<StockChange>> {
        let history = sqlx::query_as::<_, StockChange>(
            "SELECT * FROM inventory_history
             WHERE product_id = ?
             ORDER BY change_date DESC, id DESC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }
}
