//! Middleware for hf-relay
//!
//! - CORS: origin allow-list and preflight handling

pub mod cors;
