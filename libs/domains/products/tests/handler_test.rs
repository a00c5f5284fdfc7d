//! Handler tests for the products domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! Each test runs against its own in-memory SQLite database, so tests
//! are fully isolated and need no external services.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use database::sqlite::connect_in_memory;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn test_service() -> ProductService<SqliteProductRepository> {
    let pool = connect_in_memory().await.unwrap();
    SqliteProductRepository::init_schema(&pool).await.unwrap();
    ProductService::new(SqliteProductRepository::new(pool))
}

fn app(service: &ProductService<SqliteProductRepository>) -> Router {
    handlers::router(service.clone())
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_via_http(router: &Router, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&payload).unwrap()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = json_body(response.into_body()).await;
    (status, body)
}

#[tokio::test]
async fn test_create_product_returns_201_with_assigned_id() {
    let service = test_service().await;
    let app = app(&service);

    let (status, body) = create_via_http(
        &app,
        json!({
            "name": "Olive Oil",
            "unit": "l",
            "category": "Pantry",
            "brand": "Acme",
            "stock": 12,
            "status": "active"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Olive Oil");
    assert_eq!(body["stock"], 12);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["image"], Value::Null);
}

#[tokio::test]
async fn test_create_product_validates_input() {
    let service = test_service().await;
    let app = app(&service);

    // Empty name
    let (status, _) = create_via_http(&app, json!({ "name": "", "stock": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Negative stock
    let (status, _) = create_via_http(&app, json!({ "name": "Salt", "stock": -2 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_product_duplicate_name_conflicts() {
    let service = test_service().await;
    let app = app(&service);

    let (status, _) = create_via_http(&app, json!({ "name": "Salt" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_via_http(&app, json!({ "name": "Salt" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_get_product_found_and_missing() {
    let service = test_service().await;
    let app = app(&service);

    let (_, created) = create_via_http(&app, json!({ "name": "Salt", "stock": 3 })).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name, "Salt");

    let response = app
        .oneshot(Request::builder().uri("/9999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_products_pagination_envelope() {
    let service = test_service().await;
    let app = app(&service);

    for name in ["Apple", "Banana", "Cherry"] {
        create_via_http(&app, json!({ "name": name })).await;
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?page=2&limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);
}

#[tokio::test]
async fn test_list_name_sorted_middle_page() {
    let service = test_service().await;
    let app = app(&service);

    for name in ["Echo", "Alpha", "Delta", "Bravo", "Charlie"] {
        create_via_http(&app, json!({ "name": name })).await;
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?sort=name&order=asc&page=2&limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    let names: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Charlie", "Delta"]);
    assert_eq!(body["pagination"]["totalPages"], 3);
}

#[tokio::test]
async fn test_list_products_rejects_bad_parameters() {
    let service = test_service().await;
    let app = app(&service);

    for uri in ["/?limit=0", "/?limit=101", "/?page=0", "/?sort=id", "/?sort=evil", "/?order=sideways"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
    }
}

#[tokio::test]
async fn test_list_products_sorting_and_filters() {
    let service = test_service().await;
    let app = app(&service);

    create_via_http(&app, json!({ "name": "Green Tea", "category": "Drinks", "stock": 4 })).await;
    create_via_http(&app, json!({ "name": "Black Tea", "category": "Drinks", "stock": 9 })).await;
    create_via_http(&app, json!({ "name": "Teapot", "category": "Kitchen", "stock": 2 })).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/?sort=stock&order=desc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    let stocks: Vec<i64> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["stock"].as_i64().unwrap())
        .collect();
    assert_eq!(stocks, vec![9, 4, 2]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?category=Drinks&name=Green")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Green Tea");
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_search_products_by_name() {
    let service = test_service().await;
    let app = app(&service);

    create_via_http(&app, json!({ "name": "Green Tea" })).await;
    create_via_http(&app, json!({ "name": "Coffee" })).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/search?name=Tea")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 1);

    // The name parameter is required
    let response = app
        .oneshot(Request::builder().uri("/search").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product_applies_partial_patch() {
    let service = test_service().await;
    let app = app(&service);

    let (_, created) = create_via_http(
        &app,
        json!({ "name": "Salt", "unit": "kg", "stock": 5 }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{id}"))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "brand": "Acme" })).unwrap(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.brand.as_deref(), Some("Acme"));
    // Untouched fields survive the patch
    assert_eq!(product.unit.as_deref(), Some("kg"));
    assert_eq!(product.stock, 5);
}

#[tokio::test]
async fn test_update_product_empty_body_rejected() {
    let service = test_service().await;
    let app = app(&service);

    let (_, created) = create_via_http(&app, json!({ "name": "Salt" })).await;
    let id = created["id"].as_i64().unwrap();

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{id}"))
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product_rename_collision_conflicts() {
    let service = test_service().await;
    let app = app(&service);

    create_via_http(&app, json!({ "name": "Salt" })).await;
    let (_, created) = create_via_http(&app, json!({ "name": "Pepper" })).await;
    let id = created["id"].as_i64().unwrap();

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{id}"))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "name": "Salt" })).unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_stock_update_is_recorded_in_history() {
    let service = test_service().await;
    let app = app(&service);

    let (_, created) = create_via_http(&app, json!({ "name": "Salt", "stock": 5 })).await;
    let id = created["id"].as_i64().unwrap();

    let put = |stock: i64, agent: &str| {
        let request = Request::builder()
            .method("PUT")
            .uri(format!("/{id}"))
            .header("content-type", "application/json")
            .header(header::USER_AGENT, agent)
            .body(Body::from(
                serde_json::to_string(&json!({ "stock": stock })).unwrap(),
            ))
            .unwrap();
        app.clone().oneshot(request)
    };

    put(8, "stocktaker/1.0").await.unwrap();
    put(2, "stocktaker/2.0").await.unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{id}/history"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    // Most recent change first
    assert_eq!(history[0]["old_quantity"], 8);
    assert_eq!(history[0]["new_quantity"], 2);
    assert_eq!(history[0]["user_info"], "stocktaker/2.0");
    assert_eq!(history[1]["old_quantity"], 5);
    assert_eq!(history[1]["user_info"], "stocktaker/1.0");
}

#[tokio::test]
async fn test_non_stock_update_leaves_history_empty() {
    let service = test_service().await;
    let app = app(&service);

    let (_, created) = create_via_http(&app, json!({ "name": "Salt", "stock": 5 })).await;
    let id = created["id"].as_i64().unwrap();

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{id}"))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "brand": "Acme" })).unwrap(),
        ))
        .unwrap();
    app.clone().oneshot(request).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/{id}/history"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert!(body["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_product_confirmation_and_missing() {
    let service = test_service().await;
    let app = app(&service);

    let (_, created) = create_via_http(&app, json!({ "name": "Salt" })).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Product deleted successfully");

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_categories() {
    let service = test_service().await;
    let app = app(&service);

    create_via_http(&app, json!({ "name": "A", "category": "Drinks" })).await;
    create_via_http(&app, json!({ "name": "B", "category": "Drinks" })).await;
    create_via_http(&app, json!({ "name": "C", "category": "Kitchen" })).await;
    create_via_http(&app, json!({ "name": "D" })).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories/list")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["categories"], json!(["Drinks", "Kitchen"]));
}

const BOUNDARY: &str = "test-boundary";

fn multipart_request(field_name: &str, file_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri("/import")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_import_csv_reports_summary() {
    let service = test_service().await;
    let app = app(&service);

    create_via_http(&app, json!({ "name": "Existing" })).await;

    let csv = "name,unit,category,brand,stock,status,image\n\
               Fresh,kg,Pantry,Acme,4,active,\n\
               Existing,,,,2,,\n\
               ,,,,9,,\n";
    let response = app
        .clone()
        .oneshot(multipart_request("csvFile", "products.csv", csv))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Import completed");
    assert_eq!(body["added"], 1);
    assert_eq!(body["skipped"], 2);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["row"], 3);
    assert_eq!(errors[0]["error"], "Missing product name");

    // The fresh row landed in the database
    let response = app
        .oneshot(
            Request::builder()
                .uri("/search?name=Fresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_import_without_file_rejected() {
    let service = test_service().await;
    let app = app(&service);

    // Multipart body with an unrelated field name
    let response = app
        .clone()
        .oneshot(multipart_request("other", "products.csv", "name\nSalt\n"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_rejects_non_csv_file() {
    let service = test_service().await;
    let app = app(&service);

    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"csvFile\"; filename=\"data.xlsx\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         not a csv\r\n\
         --{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/import")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_empty_csv_rejected() {
    let service = test_service().await;
    let app = app(&service);

    let response = app
        .oneshot(multipart_request("csvFile", "empty.csv", "name,stock\n"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_csv_download() {
    let service = test_service().await;
    let app = app(&service);

    create_via_http(
        &app,
        json!({ "name": "Olive Oil", "unit": "l", "stock": 24 }),
    )
    .await;

    let response = app
        .oneshot(Request::builder().uri("/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"products.csv\""
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,name,unit,category,brand,stock,status,image"
    );
    assert_eq!(
        lines.next().unwrap(),
        "1,\"Olive Oil\",\"l\",\"\",\"\",24,\"\",\"\""
    );
}

#[tokio::test]
async fn test_export_import_round_trip() {
    let service = test_service().await;
    let exporter = app(&service);

    create_via_http(&exporter, json!({ "name": "Salt, Fine", "unit": "kg", "stock": 9 })).await;

    let response = exporter
        .clone()
        .oneshot(Request::builder().uri("/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();

    // Import the export into a fresh database
    let other_service = test_service().await;
    let importer = app(&other_service);
    let response = importer
        .clone()
        .oneshot(multipart_request("csvFile", "products.csv", &csv))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["added"], 1);

    let response = importer
        .oneshot(Request::builder().uri("/1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name, "Salt, Fine");
    assert_eq!(product.stock, 9);
    assert_eq!(product.unit.as_deref(), Some("kg"));
}
