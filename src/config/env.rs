use super::ServerConfig;
use super::merge::merge_config;
use super::validation::validate_config;

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads configuration from environment variables, with sensible defaults.
    /// Also loads from .env file if present using dotenvy.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Environment variables are malformed (port, timeout, boolean flags)
    /// - Configuration validation fails (site URL, sitemap paths, API base URL)
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = merge_config(None)?;
        validate_config(&config)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    // Helper to clean up environment variables after tests
    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("SITE_URL");
            env::remove_var("NEXT_PUBLIC_SITE_URL");
            env::remove_var("SITEMAP_PATHS");
            env::remove_var("SEO_VERIFICATION_FALLBACK");
            env::remove_var("GOOGLE_API_BASE_URL");
            env::remove_var("GOOGLE_API_TIMEOUT_SECONDS");
            env::remove_var("DATABASE_URL");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();

        let config = ServerConfig::from_env().expect("Should load config");
        assert_eq!(config.port, 3001);
        assert!(!config.verification_fallback);
        assert_eq!(config.google_timeout_seconds, 5);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_host_and_port() {
        cleanup_env_vars();

        unsafe {
            env::set_var("HOST", "127.0.0.1");
            env::set_var("PORT", "8080");
        }

        let config = ServerConfig::from_env().expect("Should load config");
        assert_eq!(config.address(), "127.0.0.1:8080");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_seo_settings() {
        cleanup_env_vars();

        unsafe {
            env::set_var("SITE_URL", "https://example.com");
            env::set_var("SEO_VERIFICATION_FALLBACK", "yes");
            env::set_var("DATABASE_URL", "sqlite::memory:");
        }

        let config = ServerConfig::from_env().expect("Should load config");
        assert_eq!(config.site_url(), Some("https://example.com"));
        assert!(config.verification_fallback);
        assert_eq!(config.database_url, "sqlite::memory:");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_invalid_site_url() {
        cleanup_env_vars();

        unsafe {
            env::set_var("SITE_URL", "example.com");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_relative_sitemap_path() {
        cleanup_env_vars();

        unsafe {
            env::set_var("SITEMAP_PATHS", ",about");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_zero_timeout() {
        cleanup_env_vars();

        unsafe {
            env::set_var("GOOGLE_API_TIMEOUT_SECONDS", "0");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());

        cleanup_env_vars();
    }
}
