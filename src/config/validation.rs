use url::Url;

use super::ServerConfig;

/// Validate the merged configuration
pub fn validate_config(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(site_url) = &config.site_url {
        validate_site_url(site_url)?;
    }
    validate_sitemap_paths(&config.sitemap_paths)?;
    validate_api_base_url(&config.google_api_base_url)?;

    if config.google_timeout_seconds == 0 {
        return Err("GOOGLE_API_TIMEOUT_SECONDS must be greater than zero".into());
    }

    Ok(())
}

/// Validate that the site URL is an absolute http(s) URL with a host
pub fn validate_site_url(site_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Url::parse(site_url).map_err(|e| {
        format!("Invalid site URL '{site_url}': {e} (expected e.g. https://example.com)")
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("Invalid site URL '{site_url}': scheme must be http or https").into());
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("Invalid site URL '{site_url}': missing host").into());
    }

    Ok(())
}

/// Validate that every sitemap path is either empty (site root) or starts with `/`
pub fn validate_sitemap_paths(paths: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(bad) = paths.iter().find(|p| !p.is_empty() && !p.starts_with('/')) {
        return Err(format!("Invalid sitemap path '{bad}': must be empty or start with '/'").into());
    }
    Ok(())
}

/// Validate that the Google API base URL is http(s)
pub fn validate_api_base_url(base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parsed =
        Url::parse(base_url).map_err(|e| format!("Invalid GOOGLE_API_BASE_URL '{base_url}': {e}"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(
            format!("Invalid GOOGLE_API_BASE_URL '{base_url}': scheme must be http or https")
                .into(),
        );
    }

    Ok(())
}
