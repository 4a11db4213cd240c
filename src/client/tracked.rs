//! Request phase tracking for UI bindings
//!
//! Wraps `InferenceClient` and publishes the phase of the latest call on a
//! watch channel: idle -> in-flight -> (succeeded | failed). Overlapping calls
//! are not coordinated; whichever finishes last sets the final phase.

use std::future::Future;

use tokio::sync::watch;
use tracing::debug;

use crate::client::{
    error::ClientResult,
    inference::{ensure_prompt, InferenceClient},
    models::GeneratedImage,
};

/// Observable phase of a client call
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPhase<T> {
    Idle,
    InFlight,
    Succeeded(T),
    /// Human-readable error message
    Failed(String),
}

impl<T> RequestPhase<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestPhase::InFlight)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestPhase::Succeeded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Result of a tracked call
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Text(String),
    Image(GeneratedImage),
}

/// Inference client that reports its progress
pub struct TrackedClient {
    inner: InferenceClient,
    phase: watch::Sender<RequestPhase<Generated>>,
}

impl TrackedClient {
    pub fn new(inner: InferenceClient) -> Self {
        let (phase, _) = watch::channel(RequestPhase::Idle);
        Self { inner, phase }
    }

    /// Subscribe to phase changes
    pub fn subscribe(&self) -> watch::Receiver<RequestPhase<Generated>> {
        self.phase.subscribe()
    }

    /// Current phase
    pub fn phase(&self) -> RequestPhase<Generated> {
        self.phase.borrow().clone()
    }

    /// Back to idle, dropping any data or error
    pub fn reset(&self) {
        self.phase.send_replace(RequestPhase::Idle);
    }

    pub async fn generate_text(&self, prompt: &str, model_id: Option<&str>) -> ClientResult<String> {
        ensure_prompt(prompt)?;
        self.track(self.inner.generate_text(prompt, model_id), |text| {
            Generated::Text(text.clone())
        })
        .await
    }

    pub async fn generate_image(
        &self,
        prompt: &str,
        model_id: Option<&str>,
    ) -> ClientResult<GeneratedImage> {
        ensure_prompt(prompt)?;
        self.track(self.inner.generate_image(prompt, model_id), |image| {
            Generated::Image(image.clone())
        })
        .await
    }

    async fn track<T, F>(&self, call: F, publish: impl FnOnce(&T) -> Generated) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        self.phase.send_replace(RequestPhase::InFlight);

        match call.await {
            Ok(value) => {
                self.phase.send_replace(RequestPhase::Succeeded(publish(&value)));
                Ok(value)
            }
            Err(e) => {
                debug!(error = %e, "Tracked request failed");
                self.phase.send_replace(RequestPhase::Failed(e.to_string()));
                Err(e)
            }
        }
    }
}
