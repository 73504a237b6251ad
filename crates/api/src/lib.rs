//! HTTP API server for the order intake backend.
//!
//! Provides REST endpoints for order creation, listing, details and status
//! updates, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use domain::OrderService;
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
    cors: CorsLayer,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/api/orders",
            post(routes::orders::create::<S>).get(routes::orders::list::<S>),
        )
        .route("/api/orders/{id}", get(routes::orders::get::<S>))
        .route(
            "/api/orders/{id}/status",
            patch(routes::orders::update_status::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over the given store.
pub fn create_state<S: OrderStore>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        order_service: OrderService::new(store),
    })
}

/// Builds the CORS layer, restricted to one origin when configured.
///
/// An origin that is not a valid header value falls back to allowing any
/// origin.
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "invalid CORS origin, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
