//! API routes module

use axum::{routing::get, Json, Router};
use axum::http::StatusCode;
use axum_helpers::server::{run_health_checks, HealthCheckFuture};
use database::sqlite;
use domain_products::{ProductService, SqliteProductRepository};
use serde_json::Value;
use sqlx::SqlitePool;

/// Create all API routes
pub fn routes(service: ProductService<SqliteProductRepository>) -> Router {
    Router::new().nest("/products", domain_products::handlers::router(service))
}

async fn ready(pool: SqlitePool) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async { sqlite::ping(&pool).await.map_err(|e| e.to_string()) }),
    )];

    run_health_checks(checks).await
}

/// Creates a router with the /ready endpoint backed by a database ping
pub fn ready_router(pool: SqlitePool) -> Router {
    Router::new().route("/ready", get(move || ready(pool)))
}
