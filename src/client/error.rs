//! Client-side errors

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the inference client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Invalid proxy URL: {0}")]
    InvalidUrl(String),

    /// Upstream rejected the credential (or the relay attached none)
    #[error("API Error: 401 Unauthorized - upstream rejected the request. {hint}")]
    Unauthorized { hint: &'static str },

    /// Any other non-2xx response; `message` is the upstream `error` field when present
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Failed to reach the proxy: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON in response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Result type alias for client calls
pub type ClientResult<T> = Result<T, ClientError>;
