use std::env;

use super::utils::{parse_bool, parse_list, parse_scope_list};
use super::yaml::YamlConfig;
use super::{DEFAULT_DATABASE_URL, DEFAULT_GOOGLE_TIMEOUT_SECONDS, ServerConfig};
use crate::core::providers::google::{DEFAULT_SCOPES, GOOGLE_API_BASE_URL};
use crate::core::seo::DEFAULT_SITEMAP_PATHS;

/// Merge YAML configuration with environment variables
///
/// Priority order (highest to lowest):
/// 1. YAML configuration values
/// 2. Environment variables
/// 3. Default values
///
/// Passing `None` yields the environment-only configuration.
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();

    // Helper macro to get value with priority: YAML > ENV > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            $yaml_value
                .or_else(|| env::var($env_var).ok())
                .unwrap_or_else(|| $default.to_string())
        };
    }

    // Helper macro for optional values: YAML > ENV, empty strings count as unset
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            $yaml_value
                .or_else(|| env::var($env_var).ok())
                .filter(|v: &String| !v.trim().is_empty())
        };
    }

    // Server configuration
    let host = get_value!(
        "HOST",
        yaml.server.as_ref().and_then(|s| s.host.clone()),
        "0.0.0.0"
    );

    let port = if let Some(yaml_port) = yaml.server.as_ref().and_then(|s| s.port) {
        yaml_port
    } else if let Ok(port_str) = env::var("PORT") {
        port_str
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT environment variable: {e}"))?
    } else {
        3001
    };

    // SEO configuration
    let seo = yaml.seo.as_ref();

    let site_url = get_optional!("SITE_URL", seo.and_then(|s| s.site_url.clone()))
        .or_else(|| {
            env::var("NEXT_PUBLIC_SITE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
        });

    let sitemap_paths = seo
        .and_then(|s| s.sitemap_paths.clone())
        .or_else(|| env::var("SITEMAP_PATHS").ok().map(|v| parse_list(&v)))
        .unwrap_or_else(|| DEFAULT_SITEMAP_PATHS.iter().map(|p| p.to_string()).collect());

    let verification_fallback = if let Some(flag) = seo.and_then(|s| s.verification_fallback) {
        flag
    } else if let Ok(raw) = env::var("SEO_VERIFICATION_FALLBACK") {
        parse_bool(&raw).ok_or_else(|| {
            format!("Invalid SEO_VERIFICATION_FALLBACK value '{raw}': expected true or false")
        })?
    } else {
        false
    };

    // Google configuration
    let google = yaml.google.as_ref();

    let google_client_email = get_optional!(
        "GOOGLE_SERVICE_CLIENT_EMAIL",
        google.and_then(|g| g.client_email.clone())
    );
    let google_private_key = get_optional!(
        "GOOGLE_SERVICE_PRIVATE_KEY",
        google.and_then(|g| g.private_key.clone())
    );
    let google_private_key_id = get_optional!(
        "GOOGLE_SERVICE_PRIVATE_KEY_ID",
        google.and_then(|g| g.private_key_id.clone())
    );
    let google_project_id = get_optional!(
        "GOOGLE_PROJECT_ID",
        google.and_then(|g| g.project_id.clone())
    );

    let google_scopes = google
        .and_then(|g| g.scopes.clone())
        .or_else(|| {
            env::var("GOOGLE_GSC_SCOPES")
                .ok()
                .map(|v| parse_scope_list(&v))
        })
        .filter(|scopes| !scopes.is_empty())
        .unwrap_or_else(|| DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect());

    let google_api_base_url = get_value!(
        "GOOGLE_API_BASE_URL",
        google.and_then(|g| g.api_base_url.clone()),
        GOOGLE_API_BASE_URL
    );

    let google_timeout_seconds =
        if let Some(seconds) = google.and_then(|g| g.timeout_seconds) {
            seconds
        } else if let Ok(raw) = env::var("GOOGLE_API_TIMEOUT_SECONDS") {
            raw.parse::<u64>()
                .map_err(|e| format!("Invalid GOOGLE_API_TIMEOUT_SECONDS: {e}"))?
        } else {
            DEFAULT_GOOGLE_TIMEOUT_SECONDS
        };

    // Verification store
    let database_url = get_value!(
        "DATABASE_URL",
        yaml.database.as_ref().and_then(|d| d.url.clone()),
        DEFAULT_DATABASE_URL
    );

    Ok(ServerConfig {
        host,
        port,
        site_url,
        sitemap_paths,
        verification_fallback,
        google_client_email,
        google_private_key,
        google_private_key_id,
        google_project_id,
        google_scopes,
        google_api_base_url,
        google_timeout_seconds,
        database_url,
    })
}
