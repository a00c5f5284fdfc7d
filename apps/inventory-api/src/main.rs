//! Inventory API - REST server

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::{ProductService, SqliteProductRepository};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to SQLite at {}", config.database.url);

    let pool = database::sqlite::connect_with_retry(&config.database, None).await?;
    SqliteProductRepository::init_schema(&pool).await?;

    info!("Database ready, schema initialized");

    let repository = SqliteProductRepository::new(pool.clone());
    let service = ProductService::new(repository);

    // Build REST router
    let api_routes = api::routes(service);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(config.app.clone()))
        .merge(api::ready_router(pool.clone()));

    info!("Starting Inventory API on port {}", config.server.port);

    // Run server with graceful shutdown
    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing database pool");
        pool.close().await;
        info!("Database pool closed");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Inventory API shutdown complete");
    Ok(())
}
