//! hf-relay - pass-through proxy for the Hugging Face Inference API
//!
//! The relay forwards requests under a fixed prefix to the upstream inference
//! API, attaching a bearer credential that never leaves the server. The
//! `client` module is the caller side: it talks to the relay and normalizes
//! the upstream response shapes.

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::client::{InferenceClient, TrackedClient};
pub use crate::config::Config;
pub use crate::proxy::{HfInferenceUpstream, Upstream};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Upstream the relay forwards to
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // One connection per request: idle connections are not kept around
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()?;

        let upstream: Arc<dyn Upstream> = Arc::new(HfInferenceUpstream::new(http_client, &config));

        Ok(Self::with_upstream(config, upstream))
    }

    /// Create an application state around an existing upstream
    pub fn with_upstream(config: Config, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            upstream,
        }
    }
}
