use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Product entity - one row in the products table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    /// Unique identifier (assigned by the database)
    pub id: i64,
    /// Product name (unique across the catalog)
    pub name: String,
    /// Unit of measure, e.g. "kg" or "pcs"
    pub unit: Option<String>,
    /// Free-form category label
    pub category: Option<String>,
    /// Brand name
    pub brand: Option<String>,
    /// Current stock quantity
    pub stock: i64,
    /// Free-form status label, e.g. "active"
    pub status: Option<String>,
    /// Image URL
    pub image: Option<String>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i64,
    pub status: Option<String>,
    pub image: Option<String>,
}

/// DTO for partially updating a product.
///
/// Absent fields are left untouched. A present field replaces the stored
/// value, so sending `"unit": null` is the same as omitting it.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    pub status: Option<String>,
    pub image: Option<String>,
}

impl ProductPatch {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.unit.is_none()
            && self.category.is_none()
            && self.brand.is_none()
            && self.stock.is_none()
            && self.status.is_none()
            && self.image.is_none()
    }
}

/// Sortable columns for product listings.
///
/// Acts as the allow-list for the `sort` query parameter; anything else
/// fails deserialization before it can reach a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    Name,
    Stock,
    Category,
    Brand,
}

impl SortField {
    /// Column name used in ORDER BY clauses
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Stock => "stock",
            Self::Category => "category",
            Self::Brand => "brand",
        }
    }
}

/// Sort direction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for ORDER BY clauses
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Query parameters for listing products
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema, IntoParams)]
pub struct ProductQuery {
    /// Page number, starting at 1
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    /// Page size, between 1 and 100
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    /// Sort column (defaults to id)
    pub sort: Option<SortField>,
    /// Sort direction (defaults to ascending)
    pub order: Option<SortOrder>,
    /// Exact category filter
    pub category: Option<String>,
    /// Case-insensitive substring match on name
    pub name: Option<String>,
}

impl ProductQuery {
    pub const DEFAULT_LIMIT: u32 = 100;

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page()) - 1) * i64::from(self.limit())
    }

    pub fn order(&self) -> SortOrder {
        self.order.unwrap_or_default()
    }
}

/// Pagination metadata returned alongside product listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let total_pages = (total + i64::from(limit) - 1) / i64::from(limit);
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// A page of products plus pagination metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Wrapper for endpoints that return a bare product list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductList {
    pub products: Vec<Product>,
}

/// One recorded stock change for a product
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct StockChange {
    pub id: i64,
    pub product_id: i64,
    pub old_quantity: i64,
    pub new_quantity: i64,
    pub change_date: DateTime<Utc>,
    pub user_info: String,
}

/// Stock change log for a product
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockHistory {
    pub history: Vec<StockChange>,
}

/// Distinct category names in use
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

/// Confirmation message for deletions
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl Product {
    /// Build a product (without an id) from a NewProduct DTO.
    ///
    /// The id is assigned by the database on insert; 0 is a placeholder.
    pub fn from_new(input: NewProduct) -> Self {
        Self {
            id: 0,
            name: input.name,
            unit: input.unit,
            category: input.category,
            brand: input.brand,
            stock: input.stock,
            status: input.status,
            image: input.image,
        }
    }

    /// Apply a patch, replacing each stored value whose field is present.
    pub fn apply_patch(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(unit) = patch.unit {
            self.unit = Some(unit);
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(brand) = patch.brand {
            self.brand = Some(brand);
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(status) = patch.status {
            self.status = Some(status);
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: 1,
            name: "Olive Oil".to_string(),
            unit: Some("l".to_string()),
            category: Some("Pantry".to_string()),
            brand: Some("Acme".to_string()),
            stock: 12,
            status: Some("active".to_string()),
            image: None,
        }
    }

    #[test]
    fn test_apply_patch_partial() {
        let mut product = sample_product();
        product.apply_patch(ProductPatch {
            stock: Some(30),
            brand: Some("Generic".to_string()),
            ..Default::default()
        });

        assert_eq!(product.stock, 30);
        assert_eq!(product.brand.as_deref(), Some("Generic"));
        // Untouched fields keep their values
        assert_eq!(product.name, "Olive Oil");
        assert_eq!(product.unit.as_deref(), Some("l"));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ProductPatch::default().is_empty());
        assert!(!ProductPatch {
            stock: Some(0),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_patch_rejects_negative_stock() {
        let patch = ProductPatch {
            stock: Some(-1),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_new_product_rejects_empty_name() {
        let input = NewProduct {
            name: String::new(),
            unit: None,
            category: None,
            brand: None,
            stock: 0,
            status: None,
            image: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_sort_field_deserialization_allow_list() {
        let field: SortField = serde_json::from_str("\"stock\"").unwrap();
        assert_eq!(field, SortField::Stock);
        assert_eq!(field.column(), "stock");

        // id is the implicit default, not an accepted value
        assert!(serde_json::from_str::<SortField>("\"id\"").is_err());
        assert!(serde_json::from_str::<SortField>("\"price; DROP TABLE\"").is_err());
    }

    #[test]
    fn test_query_defaults() {
        let query = ProductQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 100);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.order(), SortOrder::Asc);
    }

    #[test]
    fn test_query_offset() {
        let query = ProductQuery {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn test_query_limit_bounds() {
        let too_big = ProductQuery {
            limit: Some(101),
            ..Default::default()
        };
        assert!(too_big.validate().is_err());

        let zero_page = ProductQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(zero_page.validate().is_err());
    }

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 100, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 100, 1).total_pages, 1);
        assert_eq!(Pagination::new(1, 100, 100).total_pages, 1);
        assert_eq!(Pagination::new(1, 100, 101).total_pages, 2);
        assert_eq!(Pagination::new(2, 10, 35).total_pages, 4);
    }
}
