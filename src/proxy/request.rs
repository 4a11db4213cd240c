//! Outbound request construction
//!
//! Turns an inbound request (method, downstream path, headers, raw body) into
//! the request sent upstream.

use axum::http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, Method};
use bytes::Bytes;
use serde_json::Value;

use crate::{
    config::Credential,
    error::AppResult,
    proxy::headers::{build_outbound_headers, is_json_content_type},
};

/// A request ready to be sent to the upstream API
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Downstream path, relative to the upstream prefix (e.g. `/models/gpt2`)
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// Derive the outbound request from the inbound one
    pub fn from_inbound(
        method: Method,
        path: &str,
        inbound_headers: &HeaderMap,
        inbound_body: &Bytes,
        credential: Option<&Credential>,
    ) -> AppResult<Self> {
        let content_type = inbound_headers.get(CONTENT_TYPE);
        let body = outbound_body(&method, content_type, inbound_body)?;
        let headers = build_outbound_headers(content_type, credential);

        Ok(Self {
            method,
            path: path.to_string(),
            headers,
            body,
        })
    }
}

/// Decide what body, if any, goes upstream.
///
/// GET and HEAD never carry one. Otherwise the inbound body is parsed as JSON
/// when the content type says so, and only a non-empty object or array is
/// re-serialized and forwarded.
fn outbound_body(
    method: &Method,
    content_type: Option<&HeaderValue>,
    inbound_body: &Bytes,
) -> AppResult<Option<Bytes>> {
    if *method == Method::GET || *method == Method::HEAD {
        return Ok(None);
    }

    let is_json = content_type.is_some_and(is_json_content_type);
    if !is_json || inbound_body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    match serde_json::from_slice::<Value>(inbound_body)? {
        Value::Object(object) if !object.is_empty() => {
            Ok(Some(Bytes::from(serde_json::to_vec(&object)?)))
        }
        Value::Array(items) if !items.is_empty() => {
            Ok(Some(Bytes::from(serde_json::to_vec(&items)?)))
        }
        _ => Ok(None),
    }
}
