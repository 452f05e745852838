//! HTTP API Layer
//!
//! This crate provides the REST API for the condominium quota engine using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for the engine and the billing views
//! - **Middleware**: Request id propagation, tracing, request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses; engine errors are 422
//!   with a stable `error` code
//!
//! The API is stateless: every request carries the data it is computed from.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig};
//!
//! let app = create_router(ApiConfig::default());
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{billing, health, quota};
use crate::middleware::request_logging;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(config: ApiConfig) -> Router {
    let state = AppState { config };

    let public_routes = Router::new().route("/health", get(health::health_check));

    let engine_routes = Router::new()
        .route("/installments", post(quota::split_installments))
        .route("/weights/normalize", post(quota::normalize_weights))
        .route("/weights/permillage", post(quota::permillage))
        .route("/allocations", post(quota::allocate))
        .route("/balances", post(quota::balance))
        .route("/charges/apportion", post(quota::apportion_charge));

    let billing_routes = Router::new()
        .route("/projects/summary", post(billing::project_summary))
        .route("/quotas/grid", post(billing::quota_grid));

    let api_routes = Router::new().merge(engine_routes).merge(billing_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_logging)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
