//! HTTP routes for hf-relay
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod health;
pub mod metrics;
pub mod relay;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{middleware::cors::cors_middleware, AppState};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let prefix = state.config.route_prefix.as_str();

    // Operational routes are never forwarded
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    // `/*path` does not match the bare prefix, so `{prefix}/` is routed too
    let mut relay_routes = Router::new()
        .route(&format!("{}/*path", prefix), any(relay::relay_handler))
        .route(&format!("{}/", prefix), any(relay::relay_handler));
    if !prefix.is_empty() {
        relay_routes = relay_routes.route(prefix, any(relay::relay_handler));
    }
    let relay_routes = relay_routes.layer(DefaultBodyLimit::max(state.config.max_body_bytes));

    Router::new()
        .merge(public_routes)
        .merge(relay_routes)
        // Global middleware: CORS runs outermost so preflights short-circuit
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(state.clone(), cors_middleware))
        .with_state(state)
}
