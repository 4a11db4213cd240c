//! Inference client
//!
//! HTTP client for calling models through the relay. One request per call,
//! no retries.

use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument, warn};

use crate::client::{
    error::{ClientError, ClientResult},
    models::{
        default_text_parameters, GeneratedImage, ImageOptions, ImagePayload, QueryPayload,
        DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL,
    },
    normalize::extract_generated_text,
};

/// Where a 401 should point the developer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationHint {
    /// Relay runs on this machine
    Local,
    Production,
}

impl RemediationHint {
    /// Pick the hint from the relay base URL
    pub fn for_url(url: &Url) -> Self {
        match url.host_str() {
            Some("localhost" | "127.0.0.1" | "[::1]") => RemediationHint::Local,
            _ => RemediationHint::Production,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RemediationHint::Local => {
                "Make sure your dev proxy or server is running and HUGGINGFACE_API_KEY is set in the environment."
            }
            RemediationHint::Production => {
                "Ensure your production proxy is attaching a valid Hugging Face API key."
            }
        }
    }
}

/// Client for models served through the relay
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    /// Models base, e.g. `http://localhost:3000/api/hf/models`
    base_url: String,
    hint: RemediationHint,
}

impl InferenceClient {
    /// Create a client for the given models base URL
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(client: reqwest::Client, base_url: &str) -> ClientResult<Self> {
        let parsed =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            hint: RemediationHint::for_url(&parsed),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn hint(&self) -> RemediationHint {
        self.hint
    }

    /// Query a model and return the parsed JSON body as-is
    #[instrument(skip(self, inputs, parameters), fields(model_id = %model_id))]
    pub async fn query<I>(
        &self,
        model_id: &str,
        inputs: &I,
        parameters: &Map<String, Value>,
    ) -> ClientResult<Value>
    where
        I: Serialize + ?Sized,
    {
        let payload = QueryPayload { inputs, parameters };
        let response = self.post(model_id, &payload).await?;

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            error!(error = %e, body_len = body.len(), "Failed to parse inference response");
            ClientError::InvalidResponse(e)
        })
    }

    /// Generate text and normalize the response into a display string.
    ///
    /// An unexpected response shape is not an error; it yields the fallback
    /// string. Transport and HTTP failures are still returned.
    pub async fn generate_text(&self, prompt: &str, model_id: Option<&str>) -> ClientResult<String> {
        ensure_prompt(prompt)?;

        let response = self
            .query(
                model_id.unwrap_or(DEFAULT_TEXT_MODEL),
                prompt,
                &default_text_parameters(),
            )
            .await?;

        Ok(extract_generated_text(&response))
    }

    /// Generate an image; the body is kept as raw bytes
    #[instrument(skip(self, prompt))]
    pub async fn generate_image(
        &self,
        prompt: &str,
        model_id: Option<&str>,
    ) -> ClientResult<GeneratedImage> {
        ensure_prompt(prompt)?;

        let payload = ImagePayload {
            inputs: prompt,
            options: ImageOptions::default(),
        };
        let response = self
            .post(model_id.unwrap_or(DEFAULT_IMAGE_MODEL), &payload)
            .await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?;

        debug!(content_type = %content_type, len = bytes.len(), "Received generated image");
        Ok(GeneratedImage::new(bytes, content_type))
    }

    /// POST a JSON payload to `{base_url}/{model_id}`; non-2xx becomes an error
    async fn post<T: Serialize + ?Sized>(
        &self,
        model_id: &str,
        payload: &T,
    ) -> ClientResult<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, model_id.trim_start_matches('/'));
        debug!(url = %url, "Sending inference request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Error querying inference API");
                ClientError::Transport(e)
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let err = error_for_status(status, &body, self.hint);
        warn!(url = %url, status = %status, error = %err, "Inference request failed");
        Err(err)
    }
}

/// Reject blank prompts before any network call
pub(crate) fn ensure_prompt(prompt: &str) -> ClientResult<()> {
    if prompt.trim().is_empty() {
        return Err(ClientError::EmptyPrompt);
    }
    Ok(())
}

/// Map a non-2xx response to an error
pub fn error_for_status(status: StatusCode, body: &[u8], hint: RemediationHint) -> ClientError {
    if status == StatusCode::UNAUTHORIZED {
        return ClientError::Unauthorized {
            hint: hint.message(),
        };
    }

    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            format!(
                "API Error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        });

    ClientError::Api { status, message }
}
