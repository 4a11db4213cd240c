//! Inference client module
//!
//! Caller-side helper for the relay: sends `{inputs, parameters}` payloads,
//! turns failures into readable errors and normalizes text responses.

pub mod error;
pub mod inference;
pub mod models;
pub mod normalize;
pub mod tracked;

pub use error::{ClientError, ClientResult};
pub use inference::InferenceClient;
pub use models::*;
pub use normalize::{extract_generated_text, NO_TEXT_FALLBACK};
pub use tracked::{Generated, RequestPhase, TrackedClient};
