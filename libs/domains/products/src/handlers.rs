//! HTTP handlers for the products API

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use axum::http::HeaderMap;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CategoryList, DeleteConfirmation, NewProduct, Pagination, Product, ProductList, ProductPage,
    ProductPatch, ProductQuery, SortField, SortOrder, StockChange, StockHistory,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::transfer::{ImportRowError, ImportSummary};

/// OpenAPI documentation for the products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        search_products,
        product_history,
        list_categories,
        import_products,
        export_products,
    ),
    components(
        schemas(
            Product, NewProduct, ProductPatch, ProductQuery, ProductPage, ProductList,
            Pagination, SortField, SortOrder, StockChange, StockHistory, CategoryList,
            DeleteConfirmation, ImportSummary, ImportRowError
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Inventory management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route("/import", post(import_products))
        .route("/export", get(export_products))
        .route("/categories/list", get(list_categories))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/history", get(product_history))
        .with_state(shared_service)
}

/// List products with filtering, sorting, and pagination
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "A page of products", body = ProductPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<ProductQuery>,
) -> ProductResult<Json<ProductPage>> {
    let page = service.list_products(query).await?;
    Ok(Json(page))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<NewProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i64>,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Partially update a product.
///
/// A stock change is logged against the caller's User-Agent header.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    ValidatedJson(patch): ValidatedJson<ProductPatch>,
) -> ProductResult<Json<Product>> {
    let user_info = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("Unknown");

    let product = service.update_product(id, patch, user_info).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = DeleteConfirmation),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i64>,
) -> ProductResult<Json<DeleteConfirmation>> {
    service.delete_product(id).await?;
    Ok(Json(DeleteConfirmation {
        message: "Product deleted successfully".to_string(),
    }))
}

/// Search query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Name substring to search for
    #[serde(default)]
    pub name: String,
}

/// Search products by name substring
#[utoipa::path(
    get,
    path = "/search",
    tag = "Products",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products", body = ProductList),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<SearchQuery>,
) -> ProductResult<Json<ProductList>> {
    let products = service.search_products(&query.name).await?;
    Ok(Json(ProductList { products }))
}

/// Stock change log for a product, most recent first
#[utoipa::path(
    get,
    path = "/{id}/history",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Stock change log", body = StockHistory),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn product_history<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i64>,
) -> ProductResult<Json<StockHistory>> {
    let history = service.product_history(id).await?;
    Ok(Json(StockHistory { history }))
}

/// Distinct category names in use
#[utoipa::path(
    get,
    path = "/categories/list",
    tag = "Products",
    responses(
        (status = 200, description = "Category names", body = CategoryList),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<CategoryList>> {
    let categories = service.categories().await?;
    Ok(Json(CategoryList { categories }))
}

/// Import products from an uploaded CSV file.
///
/// Expects a multipart form with the file under the `csvFile` field.
#[utoipa::path(
    post,
    path = "/import",
    tag = "Products",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import summary", body = ImportSummary),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn import_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    mut multipart: Multipart,
) -> ProductResult<Json<ImportSummary>> {
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProductError::Validation(e.to_string()))?
    {
        if field.name() != Some("csvFile") {
            continue;
        }

        let is_csv = field
            .file_name()
            .map(|f| f.to_ascii_lowercase().ends_with(".csv"))
            .unwrap_or(false)
            || field.content_type() == Some("text/csv");
        if !is_csv {
            return Err(ProductError::Validation(
                "Only CSV files are allowed".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ProductError::Validation(e.to_string()))?;
        data = Some(bytes.to_vec());
        break;
    }

    let data = data.ok_or(ProductError::MissingFile)?;
    let summary = service.import_csv(&data).await?;
    Ok(Json(summary))
}

/// Download every product as a CSV attachment
#[utoipa::path(
    get,
    path = "/export",
    tag = "Products",
    responses(
        (status = 200, description = "CSV export of all products", content_type = "text/csv"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn export_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<impl IntoResponse> {
    let csv = service.export_csv().await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"products.csv\"",
            ),
        ],
        csv,
    ))
}
