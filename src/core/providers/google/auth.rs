//! Google service-account authentication.
//!
//! The Site Verification and Search Console APIs are called on behalf of a
//! service account. The identity (client email + PEM private key) and the
//! OAuth2 scopes come from [`ServerConfig`]; they are turned into
//! `google-cloud-auth` service-account credentials which mint bearer tokens.
//!
//! # Example
//!
//! ```rust,no_run
//! use sitebeacon::ServerConfig;
//! use sitebeacon::core::providers::google::{GoogleAuthClient, TokenProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_env()?;
//!     let client = GoogleAuthClient::from_config(&config)?;
//!     let token = client.get_token().await?;
//!     Ok(())
//! }
//! ```

use google_cloud_auth::credentials::{Credentials, service_account};
use http::Extensions;
use serde_json::json;
use tracing::{debug, error};

use super::error::GoogleError;
use crate::config::ServerConfig;

/// Suffix of Google-managed service account email addresses.
const SERVICE_ACCOUNT_DOMAIN: &str = ".iam.gserviceaccount.com";

/// A service account identity: who we are when talking to Google.
#[derive(Clone, PartialEq)]
pub struct ServiceAccountIdentity {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: String,
    pub project_id: String,
}

impl std::fmt::Debug for ServiceAccountIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountIdentity")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .finish()
    }
}

impl ServiceAccountIdentity {
    /// Reads the identity from server configuration.
    ///
    /// # Errors
    ///
    /// Returns `GoogleError::ConfigurationError` when the client email or the
    /// private key is absent or blank.
    pub fn from_config(config: &ServerConfig) -> Result<Self, GoogleError> {
        let client_email = config
            .google_client_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                GoogleError::ConfigurationError(
                    "GOOGLE_SERVICE_CLIENT_EMAIL is not configured".to_string(),
                )
            })?
            .to_string();

        let private_key = config
            .google_private_key
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(unescape_private_key)
            .ok_or_else(|| {
                GoogleError::ConfigurationError(
                    "GOOGLE_SERVICE_PRIVATE_KEY is not configured".to_string(),
                )
            })?;

        let project_id = config
            .google_project_id
            .clone()
            .or_else(|| project_from_email(&client_email))
            .unwrap_or_default();

        let identity = Self {
            client_email,
            private_key,
            private_key_id: config.google_private_key_id.clone().unwrap_or_default(),
            project_id,
        };
        identity.validate()?;
        Ok(identity)
    }

    /// Checks the identity for obvious mistakes before handing it to the auth library.
    pub fn validate(&self) -> Result<(), GoogleError> {
        if !self.client_email.contains('@') {
            return Err(GoogleError::ConfigurationError(format!(
                "Invalid service account email: {}",
                self.client_email
            )));
        }

        if !self.private_key.contains("PRIVATE KEY-----") {
            return Err(GoogleError::ConfigurationError(
                "Invalid service account private key: expected a PEM encoded key".to_string(),
            ));
        }

        Ok(())
    }

    /// Renders the identity as a service account key file.
    fn to_key_json(&self) -> serde_json::Value {
        json!({
            "type": "service_account",
            "client_email": self.client_email,
            "private_key": self.private_key,
            "private_key_id": self.private_key_id,
            "project_id": self.project_id,
        })
    }
}

/// Env-provided PEM keys usually carry literal `\n` sequences instead of newlines.
pub fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// `name@my-project.iam.gserviceaccount.com` → `my-project`.
fn project_from_email(email: &str) -> Option<String> {
    let (_, domain) = email.split_once('@')?;
    domain
        .strip_suffix(SERVICE_ACCOUNT_DOMAIN)
        .filter(|project| !project.is_empty())
        .map(str::to_string)
}

/// Trait for providing OAuth2 access tokens for Google APIs.
///
/// This trait abstracts token retrieval, allowing for different implementations
/// (service account credentials, fixed tokens for emulators, mocks for tests).
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Retrieves a bearer token for Google APIs.
    ///
    /// # Errors
    ///
    /// Returns `GoogleError::AuthenticationFailed` if token retrieval fails.
    async fn get_token(&self) -> Result<String, GoogleError>;
}

/// Google authentication client backed by service account credentials.
pub struct GoogleAuthClient {
    credentials: Credentials,
    client_email: String,
}

impl std::fmt::Debug for GoogleAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAuthClient")
            .field("client_email", &self.client_email)
            .field("credentials", &"<credentials>")
            .finish()
    }
}

impl GoogleAuthClient {
    /// Creates a new authentication client for a service account.
    ///
    /// # Arguments
    ///
    /// * `identity` - The service account identity
    /// * `scopes` - OAuth2 scopes required for the APIs being accessed
    ///
    /// # Errors
    ///
    /// Returns an error if the scope list is empty or the credentials cannot be built.
    pub fn new<S: AsRef<str>>(
        identity: ServiceAccountIdentity,
        scopes: &[S],
    ) -> Result<Self, GoogleError> {
        identity.validate()?;

        let scope_strings: Vec<String> = scopes
            .iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if scope_strings.is_empty() {
            return Err(GoogleError::ConfigurationError(
                "At least one OAuth2 scope is required".to_string(),
            ));
        }

        let credentials = service_account::Builder::new(identity.to_key_json())
            .with_access_specifier(service_account::AccessSpecifier::from_scopes(
                scope_strings,
            ))
            .build()
            .map_err(|e| {
                error!(error = %e, client_email = %identity.client_email, "Failed to initialize service account credentials");
                GoogleError::AuthenticationFailed(format!(
                    "Failed to initialize service account credentials: {e}"
                ))
            })?;

        debug!(client_email = %identity.client_email, "Google authentication client initialized");
        Ok(Self {
            credentials,
            client_email: identity.client_email,
        })
    }

    /// Creates an auth client from the identity and scopes in server configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self, GoogleError> {
        let identity = ServiceAccountIdentity::from_config(config)?;
        Self::new(identity, &config.google_scopes)
    }
}

/// Pulls the bearer token out of the headers produced by a credential exchange.
///
/// Anything other than a fresh `Authorization: Bearer <token>` header is an
/// authentication failure.
fn token_from_headers(
    headers: google_cloud_auth::credentials::CacheableResource<http::HeaderMap>,
) -> Result<String, GoogleError> {
    use google_cloud_auth::credentials::CacheableResource;

    let header_map = match headers {
        CacheableResource::New { data, .. } => data,
        CacheableResource::NotModified => {
            return Err(GoogleError::AuthenticationFailed(
                "Received NotModified response but no cached token available".to_string(),
            ));
        }
    };

    let auth_value = header_map.get(http::header::AUTHORIZATION).ok_or_else(|| {
        GoogleError::AuthenticationFailed("No Authorization header in credentials response".to_string())
    })?;

    let auth_str = auth_value.to_str().map_err(|e| {
        GoogleError::AuthenticationFailed(format!("Invalid Authorization header value: {e}"))
    })?;

    auth_str
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            GoogleError::AuthenticationFailed("Authorization header is not a Bearer token".to_string())
        })
}

#[async_trait::async_trait]
impl TokenProvider for GoogleAuthClient {
    async fn get_token(&self) -> Result<String, GoogleError> {
        let headers = self
            .credentials
            .headers(Extensions::new())
            .await
            .map_err(|e| {
                error!(error = %e, client_email = %self.client_email, "Failed to fetch access token");
                GoogleError::AuthenticationFailed(format!("Failed to fetch access token: {e}"))
            })?;

        token_from_headers(headers)
    }
}

/// Token provider that always hands out the same token.
///
/// Used against local API emulators and in integration tests.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<String, GoogleError> {
        if self.token.is_empty() {
            return Err(GoogleError::AuthenticationFailed(
                "Static token is empty".to_string(),
            ));
        }
        Ok(self.token.clone())
    }
}

/// A mock token provider for testing purposes.
#[cfg(test)]
pub struct MockTokenProvider {
    pub token: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
impl MockTokenProvider {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            error: None,
        }
    }

    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            token: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl TokenProvider for MockTokenProvider {
    async fn get_token(&self) -> Result<String, GoogleError> {
        if let Some(ref error) = self.error {
            Err(GoogleError::AuthenticationFailed(error.clone()))
        } else if let Some(ref token) = self.token {
            Ok(token.clone())
        } else {
            Err(GoogleError::AuthenticationFailed(
                "Mock provider not configured".to_string(),
            ))
        }
    }
}
