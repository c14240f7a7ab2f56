//! Configuration module for the sitebeacon server
//!
//! This module handles server configuration from YAML files and environment
//! variables. The configuration is split into logical submodules:
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use sitebeacon::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file, filling gaps from the environment
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::core::providers::google::{DEFAULT_SCOPES, GOOGLE_API_BASE_URL};
use crate::core::seo::DEFAULT_SITEMAP_PATHS;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://seo.db";
pub const DEFAULT_GOOGLE_TIMEOUT_SECONDS: u64 = 5;

/// Server configuration
///
/// Contains everything needed to run the server:
/// - Server settings (host, port)
/// - SEO settings (public site URL, sitemap paths, verification fallback)
/// - Google service account identity, scopes and API endpoint
/// - Verification store location
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // SEO settings
    /// Public URL of the site being verified, e.g. `https://example.com`.
    pub site_url: Option<String>,
    /// Static paths listed in the sitemap, relative to the base URL.
    pub sitemap_paths: Vec<String>,
    /// Serve a synthesized page for unknown verification files instead of 404.
    pub verification_fallback: bool,

    // Google service account
    pub google_client_email: Option<String>,
    pub google_private_key: Option<String>,
    pub google_private_key_id: Option<String>,
    pub google_project_id: Option<String>,
    pub google_scopes: Vec<String>,
    pub google_api_base_url: String,
    pub google_timeout_seconds: u64,

    // Verification store
    pub database_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            site_url: None,
            sitemap_paths: DEFAULT_SITEMAP_PATHS.iter().map(|p| p.to_string()).collect(),
            verification_fallback: false,
            google_client_email: None,
            google_private_key: None,
            google_private_key_id: None,
            google_project_id: None,
            google_scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            google_api_base_url: GOOGLE_API_BASE_URL.to_string(),
            google_timeout_seconds: DEFAULT_GOOGLE_TIMEOUT_SECONDS,
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file merged with environment variables
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables
    /// 3. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // The .env file is not loaded here: with an explicit YAML file, only real
        // environment variables fill the gaps.
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_config(&config)?;

        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout applied to every Google API call.
    pub fn google_timeout(&self) -> Duration {
        Duration::from_secs(self.google_timeout_seconds)
    }

    /// Configured site URL without a trailing slash, if any.
    pub fn site_url(&self) -> Option<&str> {
        self.site_url
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .filter(|s| !s.is_empty())
    }

    /// Check if a Google service account identity is configured
    pub fn has_google_credentials(&self) -> bool {
        self.google_client_email.is_some() && self.google_private_key.is_some()
    }
}
