//! Proxy module
//!
//! Handles request forwarding to the upstream inference API.

pub mod headers;
pub mod path;
pub mod request;
pub mod upstream;

pub use request::OutboundRequest;
pub use upstream::{HfInferenceUpstream, Upstream, UpstreamResponse};
