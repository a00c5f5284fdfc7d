//! CORS layer construction.

use axum::http::{HeaderValue, Method};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

/// Build a CORS layer restricted to an explicit origin list.
///
/// Allows the standard REST methods plus OPTIONS, the Content-Type and
/// Accept headers, and caches preflight results for one hour.
///
/// # Errors
/// Returns an error if `origins` is empty or any entry is not a valid
/// header value.
pub fn create_cors_layer(origins: &[&str]) -> io::Result<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid CORS origin '{s}': {e}"),
                )
            })
        })
        .collect::<Result<_, _>>()?;

    if allowed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS origin list cannot be empty",
        ));
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600)))
}

/// Build a CORS layer that accepts any origin, method, and header.
///
/// Suitable for local development and for deployments fronted by a
/// gateway that enforces origin policy.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build a CORS layer from the `CORS_ALLOWED_ORIGIN` environment variable.
///
/// The variable holds comma-separated origins, e.g.
/// `CORS_ALLOWED_ORIGIN=http://localhost:3000,https://example.com`.
/// When unset, falls back to the permissive layer and logs a warning.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    match std::env::var("CORS_ALLOWED_ORIGIN") {
        Ok(origins_str) => {
            let origins: Vec<&str> = origins_str.split(',').collect();
            let layer = create_cors_layer(&origins)?;
            info!("CORS configured with allowed origins: {}", origins_str);
            Ok(layer)
        }
        Err(_) => {
            warn!("CORS_ALLOWED_ORIGIN not set, allowing all origins");
            Ok(create_permissive_cors_layer())
        }
    }
}
