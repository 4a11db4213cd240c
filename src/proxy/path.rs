//! Path rewriting between the relay prefix and the upstream prefix

/// Strip the relay prefix from an inbound path.
///
/// Returns `None` when the path is not under the prefix. A prefix only matches
/// on a segment boundary, so `/api/hf` does not claim `/api/hfx`.
pub fn downstream_path<'a>(route_prefix: &str, path: &'a str) -> Option<&'a str> {
    let rest = path.strip_prefix(route_prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Full upstream URL for a downstream path
pub fn upstream_url(base_url: &str, upstream_prefix: &str, downstream: &str) -> String {
    format!("{}{}{}", base_url, upstream_prefix, downstream)
}
