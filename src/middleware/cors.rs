//! CORS middleware
//!
//! Grants browser access according to the configured origin allow-list and
//! answers preflight requests without touching the upstream API.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::{config::OriginPolicy, AppState};

/// Methods advertised to browsers
pub const ALLOW_METHODS: &str = "GET,POST,OPTIONS";
/// Request headers advertised to browsers
pub const ALLOW_HEADERS: &str = "Content-Type,Authorization";

/// Value of `Access-Control-Allow-Origin` for a given request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigin {
    /// `*`
    Any,
    /// The request's own origin, echoed back
    Echo(HeaderValue),
    /// The literal `null`; the browser will not expose the response
    Denied,
}

/// Resolve the CORS grant for a request origin
pub fn resolve_origin(policy: &OriginPolicy, origin: Option<&HeaderValue>) -> AllowedOrigin {
    match policy {
        OriginPolicy::Any => AllowedOrigin::Any,
        OriginPolicy::List(allowed) => match origin {
            Some(origin)
                if origin
                    .to_str()
                    .is_ok_and(|origin| allowed.iter().any(|entry| entry == origin)) =>
            {
                AllowedOrigin::Echo(origin.clone())
            }
            _ => AllowedOrigin::Denied,
        },
    }
}

/// Write the CORS headers for a grant onto a response
pub fn apply_cors_headers(headers: &mut HeaderMap, grant: &AllowedOrigin) {
    match grant {
        AllowedOrigin::Any => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        }
        AllowedOrigin::Echo(origin) => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.append(VARY, HeaderValue::from_static("Origin"));
        }
        AllowedOrigin::Denied => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("null"));
        }
    }

    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// CORS middleware
///
/// This middleware:
/// 1. Resolves the allowed origin from the `Origin` header
/// 2. Answers `OPTIONS` with an empty 204 (never forwarded)
/// 3. Otherwise runs the request and decorates the response
///
/// A denied origin is still processed; only the browser-visible grant is
/// withheld.
pub async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let grant = resolve_origin(
        &state.config.allowed_origins,
        request.headers().get(ORIGIN),
    );

    if grant == AllowedOrigin::Denied {
        debug!(
            origin = ?request.headers().get(ORIGIN),
            path = %request.uri().path(),
            "Origin not in allow-list"
        );
    }

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    apply_cors_headers(response.headers_mut(), &grant);
    response
}
