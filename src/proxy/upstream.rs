//! Upstream inference API client
//!
//! Sends one outbound request per inbound request and buffers the full
//! response. No retries, no streaming.

use async_trait::async_trait;
use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use bytes::Bytes;
use tracing::{debug, error, info, instrument};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    proxy::{path::upstream_url, OutboundRequest},
};

/// Response received from the upstream API, forwarded unchanged
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Trait for the upstream side of the relay
///
/// The relay handler only talks to this trait, so tests can swap in a
/// recording implementation.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Upstream name for logging
    fn name(&self) -> &'static str;

    /// Human-readable target (base URL + prefix)
    fn target(&self) -> String;

    /// Send a request and return the complete response.
    ///
    /// Non-2xx statuses are not errors; only transport failures are.
    async fn send(&self, request: OutboundRequest) -> AppResult<UpstreamResponse>;
}

/// Hugging Face Inference API upstream
pub struct HfInferenceUpstream {
    client: reqwest::Client,
    base_url: String,
    path_prefix: String,
}

impl HfInferenceUpstream {
    /// Create a new upstream client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.upstream_url.clone(),
            path_prefix: config.upstream_prefix.clone(),
        }
    }
}

#[async_trait]
impl Upstream for HfInferenceUpstream {
    fn name(&self) -> &'static str {
        "hf-inference"
    }

    fn target(&self) -> String {
        format!("{}{}", self.base_url, self.path_prefix)
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: OutboundRequest) -> AppResult<UpstreamResponse> {
        let url = upstream_url(&self.base_url, &self.path_prefix, &request.path);
        info!(url = %url, method = %request.method, "Forwarding request upstream");

        let mut request_builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers);

        if let Some(body) = request.body {
            debug!(url = %url, body_len = body.len(), "Attaching request body");
            request_builder = request_builder.body(body);
        }

        let response = request_builder.send().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to send request upstream");
            AppError::Upstream(e)
        })?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();

        let body = response.bytes().await.map_err(|e| {
            error!(url = %url, status = %status, error = %e, "Failed to read upstream response body");
            AppError::Upstream(e)
        })?;

        debug!(
            url = %url,
            status = %status,
            body_len = body.len(),
            "Received response from upstream"
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
