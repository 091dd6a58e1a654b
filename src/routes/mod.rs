//! Router assembly: route groups plus CORS, tracing, body limit and request id layers.

pub mod common;
pub mod customer;

pub use common::common_routes;
pub use customer::customer_routes;

use crate::config::CorsConfig;
use crate::error::ConfigError;
use crate::state::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Full application router.
pub fn app(state: AppState, cors: &CorsConfig) -> Result<Router, ConfigError> {
    let router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(customer_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(axum::middleware::from_fn(crate::middleware::request_id))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors)?);
    Ok(router)
}

/// CORS for the configured origins. A `*` entry allows any origin, without credentials.
pub fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if cors.allowed_origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(AllowOrigin::any()));
    }

    let origins = cors
        .allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|_| ConfigError::Invalid {
                var: "ALLOWED_ORIGINS",
                value: o.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}
