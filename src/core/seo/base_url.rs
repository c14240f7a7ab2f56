/// Resolves the public base URL for generated SEO documents.
///
/// Priority: the request `Host` header (plain `http` for loopback hosts,
/// `https` otherwise), then the configured site URL, then
/// `http://localhost:<port>`. The result never ends with `/`.
pub fn resolve_base_url(host: Option<&str>, site_url: Option<&str>, port: u16) -> String {
    if let Some(host) = host.map(str::trim).filter(|h| !h.is_empty()) {
        let protocol = if is_loopback_host(host) { "http" } else { "https" };
        return format!("{protocol}://{host}");
    }

    if let Some(site_url) = site_url.map(str::trim).filter(|s| !s.is_empty()) {
        return site_url.trim_end_matches('/').to_string();
    }

    format!("http://localhost:{port}")
}

fn is_loopback_host(host: &str) -> bool {
    host.starts_with("localhost") || host.starts_with("127.0.0.1") || host.starts_with("[::1]")
}
