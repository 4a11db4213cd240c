//! Relay handler
//!
//! Forwards every request under the route prefix to the upstream inference
//! API and hands back the upstream status, content type and body unchanged.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::{OriginalUri, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method},
    response::Response,
};
use tracing::{error, info};

use crate::{
    error::AppError,
    proxy::{path::downstream_path, OutboundRequest},
    routes::metrics::{record_request, record_upstream_error},
    AppState,
};

/// Relay handler for `{route_prefix}/*`
///
/// This handler:
/// 1. Strips the route prefix from the path
/// 2. Builds outbound headers and body (credential from config)
/// 3. Sends exactly one request upstream
/// 4. Mirrors status and content type, copies the body byte-for-byte
pub async fn relay_handler(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let start_time = Instant::now();
    let path = uri.path();

    let forward_path = downstream_path(&state.config.route_prefix, path).unwrap_or(path);

    info!(
        method = %method,
        path = %path,
        forward_path = %forward_path,
        upstream = state.upstream.name(),
        "Processing relay request"
    );

    let outbound = OutboundRequest::from_inbound(
        method.clone(),
        forward_path,
        &headers,
        &body,
        state.config.credential.as_ref(),
    )?;

    let upstream_response = match state.upstream.send(outbound).await {
        Ok(response) => response,
        Err(e) => {
            record_upstream_error(method.as_str());
            error!(method = %method, path = %path, error = %e, "Proxy error");
            return Err(e);
        }
    };

    let duration = start_time.elapsed().as_secs_f64();
    record_request(method.as_str(), upstream_response.status.as_u16(), duration);

    info!(
        method = %method,
        path = %path,
        status = %upstream_response.status,
        body_len = upstream_response.body.len(),
        duration_ms = %format!("{:.2}", duration * 1000.0),
        "Relay request completed"
    );

    let mut builder = Response::builder().status(upstream_response.status);
    if let Some(content_type) = upstream_response.content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }

    builder
        .body(Body::from(upstream_response.body))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}
