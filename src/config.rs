//! Configuration management for hf-relay
//!
//! Configuration is loaded from environment variables once at startup. The
//! resulting value is immutable and handed to request handlers through
//! `AppState`; nothing in the forwarding path reads the environment.

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use axum::http::HeaderValue;

/// Upstream inference host
pub const DEFAULT_UPSTREAM_URL: &str = "https://router.huggingface.co";
/// Path prepended to every forwarded request
pub const DEFAULT_UPSTREAM_PREFIX: &str = "/hf-inference";
/// Inbound prefix served by the relay
pub const DEFAULT_ROUTE_PREFIX: &str = "/api/hf";
/// Inbound body limit (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Bearer credential attached to outbound requests.
///
/// Holds the complete `Bearer <token>` header value, marked sensitive so it
/// never shows up in logs or `Debug` output.
#[derive(Clone)]
pub struct Credential(HeaderValue);

impl Credential {
    /// Build a credential from a raw token
    pub fn new(token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("API key contains characters that are not valid in an HTTP header")?;
        value.set_sensitive(true);
        Ok(Self(value))
    }

    /// Pick the first non-blank token out of the candidate variables
    pub fn from_candidates<I>(candidates: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        candidates
            .into_iter()
            .flatten()
            .map(|token| token.trim().to_string())
            .find(|token| !token.is_empty())
            .map(|token| Self::new(&token))
            .transpose()
    }

    /// The `Authorization` header value
    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Which browser origins are granted CORS access
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Every origin (`*`)
    Any,
    /// Only the listed origins
    List(Vec<String>),
}

impl OriginPolicy {
    /// Parse a comma-separated allow-list.
    ///
    /// An empty list, or one containing `*`, allows any origin.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            OriginPolicy::Any
        } else {
            OriginPolicy::List(origins)
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Bearer credential for the upstream API (optional, warned about at startup)
    pub credential: Option<Credential>,
    /// CORS allow-list
    pub allowed_origins: OriginPolicy,

    /// Upstream base URL, without trailing slash
    pub upstream_url: String,
    /// Path prefix added in front of the forwarded sub-path
    pub upstream_prefix: String,
    /// Inbound prefix that is stripped before forwarding
    pub route_prefix: String,

    /// Maximum accepted inbound body size
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HF_RELAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,

            credential: Credential::from_candidates([
                env::var("HUGGINGFACE_API_KEY").ok(),
                env::var("HF_TOKEN").ok(),
            ])
            .context("Invalid HUGGINGFACE_API_KEY / HF_TOKEN")?,
            allowed_origins: OriginPolicy::parse(
                &env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            ),

            upstream_url: env::var("HF_RELAY_UPSTREAM_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            upstream_prefix: normalize_prefix(
                &env::var("HF_RELAY_UPSTREAM_PREFIX")
                    .unwrap_or_else(|_| DEFAULT_UPSTREAM_PREFIX.to_string()),
            ),
            route_prefix: normalize_prefix(
                &env::var("HF_RELAY_ROUTE_PREFIX")
                    .unwrap_or_else(|_| DEFAULT_ROUTE_PREFIX.to_string()),
            ),

            max_body_bytes: env::var("HF_RELAY_MAX_BODY_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_BODY_BYTES.to_string())
                .parse()
                .context("Invalid HF_RELAY_MAX_BODY_BYTES")?,
        })
    }

    /// Address to bind, accepting IPv4 and IPv6 hosts (`0.0.0.0`, `::`, `[::1]`)
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        let ip: IpAddr = host
            .parse()
            .with_context(|| format!("Invalid HF_RELAY_HOST: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Force a leading slash and drop trailing ones (`hf/` -> `/hf`, `/` -> ``)
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
