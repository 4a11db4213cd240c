//! Inference request and response models

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Default model for text generation
pub const DEFAULT_TEXT_MODEL: &str = "gpt2";
/// Default model for text-to-image generation
pub const DEFAULT_IMAGE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";

/// Generic query payload
#[derive(Debug, Serialize)]
pub struct QueryPayload<'a, I: Serialize + ?Sized> {
    pub inputs: &'a I,
    pub parameters: &'a Map<String, Value>,
}

/// Text-to-image payload
#[derive(Debug, Serialize)]
pub struct ImagePayload<'a> {
    pub inputs: &'a str,
    pub options: ImageOptions,
}

/// Upstream options sent with image requests
#[derive(Debug, Clone, Serialize)]
pub struct ImageOptions {
    /// Block until a cold model is loaded instead of failing with 503
    pub wait_for_model: bool,
    pub use_cache: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            wait_for_model: true,
            use_cache: false,
        }
    }
}

/// Parameters sent by `generate_text`
pub fn default_text_parameters() -> Map<String, Value> {
    let mut parameters = Map::new();
    parameters.insert("max_length".to_string(), json!(100));
    parameters.insert("num_return_sequences".to_string(), json!(1));
    parameters
}

/// A generated image: raw bytes plus a self-contained URL to render them
#[derive(Clone, PartialEq)]
pub struct GeneratedImage {
    pub bytes: Bytes,
    pub content_type: String,
    /// `data:` URL carrying the bytes
    pub url: String,
}

impl GeneratedImage {
    pub fn new(bytes: Bytes, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        let url = format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes));
        Self {
            bytes,
            content_type,
            url,
        }
    }
}

impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
