//! CSV import parsing and export formatting

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product};

/// One parsed CSV row, before any validation or duplicate checks
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub name: String,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub stock: i64,
    pub status: Option<String>,
    pub image: Option<String>,
}

impl From<ImportRow> for NewProduct {
    fn from(row: ImportRow) -> Self {
        NewProduct {
            name: row.name,
            unit: row.unit,
            category: row.category,
            brand: row.brand,
            stock: row.stock,
            status: row.status,
            image: row.image,
        }
    }
}

/// Error attached to a single import row (1-based index)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportRowError {
    pub row: usize,
    pub error: String,
}

/// Result summary of a CSV import
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportSummary {
    pub message: String,
    pub added: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ImportRowError>>,
}

impl ImportSummary {
    pub fn new(added: usize, skipped: usize, errors: Vec<ImportRowError>) -> Self {
        Self {
            message: "Import completed".to_string(),
            added,
            skipped,
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }
}

/// Look up a column by its lowercase header, falling back to the
/// Capitalized spelling some spreadsheet exports produce.
fn field(record: &csv::StringRecord, headers: &csv::StringRecord, name: &str) -> Option<String> {
    let capitalized = {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    };

    headers
        .iter()
        .position(|h| h == name)
        .or_else(|| headers.iter().position(|h| h == capitalized))
        .and_then(|i| record.get(i))
        .map(str::to_string)
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse CSV bytes into import rows.
///
/// The first record is treated as the header. Missing or unparseable
/// stock values default to 0; a missing name becomes an empty string so
/// the caller can report it against the row number.
pub fn parse_rows(data: &[u8]) -> ProductResult<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| ProductError::CsvParse(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ProductError::CsvParse(e.to_string()))?;

        let stock = field(&record, &headers, "stock")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0);

        rows.push(ImportRow {
            name: field(&record, &headers, "name").unwrap_or_default(),
            unit: optional(field(&record, &headers, "unit")),
            category: optional(field(&record, &headers, "category")),
            brand: optional(field(&record, &headers, "brand")),
            stock,
            status: optional(field(&record, &headers, "status")),
            image: optional(field(&record, &headers, "image")),
        });
    }

    Ok(rows)
}

/// Quote a text field: always wrapped in double quotes, embedded quotes doubled
fn quoted(value: Option<&str>) -> String {
    format!("\"{}\"", value.unwrap_or("").replace('"', "\"\""))
}

/// Render products as CSV.
///
/// Text columns are always quoted; id and stock are written bare. The
/// column order matches the import header set.
pub fn export_csv(products: &[Product]) -> String {
    let mut out = String::from("id,name,unit,category,brand,stock,status,image\n");

    for product in products {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            product.id,
            quoted(Some(&product.name)),
            quoted(product.unit.as_deref()),
            quoted(product.category.as_deref()),
            quoted(product.brand.as_deref()),
            product.stock,
            quoted(product.status.as_deref()),
            quoted(product.image.as_deref()),
        ));
    }

    out
}
