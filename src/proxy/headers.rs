//! Header utilities for upstream proxying
//!
//! Only `Content-Type` crosses from the caller to the upstream API. The
//! `Authorization` header always comes from server configuration, so a
//! caller-supplied one is never forwarded.

use axum::http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::Credential;

/// Content type used when the caller sends none
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Build headers for an outbound request
pub fn build_outbound_headers(
    content_type: Option<&HeaderValue>,
    credential: Option<&Credential>,
) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        CONTENT_TYPE,
        content_type
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );

    if let Some(credential) = credential {
        headers.insert(AUTHORIZATION, credential.header_value().clone());
    }

    headers
}

/// Whether a content type carries JSON (`application/json`, `application/*+json`)
pub fn is_json_content_type(value: &HeaderValue) -> bool {
    let Ok(value) = value.to_str() else {
        return false;
    };
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
