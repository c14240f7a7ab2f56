//! Authenticated REST client for Google APIs.
//!
//! Wraps a pooled `reqwest::Client`, the API base URL and a [`TokenProvider`].
//! Every request fetches a fresh bearer token and non-2xx responses are turned
//! into [`GoogleError::UpstreamError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sitebeacon::core::providers::google::{GoogleApiClient, StaticTokenProvider};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = GoogleApiClient::build_http_client(Duration::from_secs(5))?;
//!     let client = GoogleApiClient::new(
//!         http,
//!         "https://www.googleapis.com",
//!         Arc::new(StaticTokenProvider::new("token")),
//!     );
//!     let report = client
//!         .send_json(reqwest::Method::GET, "/webmasters/v3/sites", None)
//!         .await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response};
use tracing::{debug, warn};

use super::auth::TokenProvider;
use super::error::GoogleError;

/// Default base URL for Google REST APIs.
pub const GOOGLE_API_BASE_URL: &str = "https://www.googleapis.com";

/// Default per-call timeout for Google API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Percent-encodes a value for use as a single URL path segment.
///
/// Equivalent to JavaScript's `encodeURIComponent` for the characters that can
/// appear in site and sitemap URLs (`:` → `%3A`, `/` → `%2F`).
pub fn encode_path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// HTTP client for Google REST endpoints authenticated with bearer tokens.
#[derive(Clone)]
pub struct GoogleApiClient {
    client: Client,
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for GoogleApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleApiClient")
            .field("base_url", &self.base_url)
            .field("token_provider", &"<token provider>")
            .finish()
    }
}

impl GoogleApiClient {
    /// Creates a client from an existing connection pool.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token_provider,
        }
    }

    /// Builds the pooled HTTP client used for all Google calls.
    ///
    /// # Errors
    ///
    /// Returns `GoogleError::ConfigurationError` if the TLS backend cannot be initialised.
    pub fn build_http_client(timeout: Duration) -> Result<Client, GoogleError> {
        Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| GoogleError::ConfigurationError(format!("Failed to create HTTP client: {e}")))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds an absolute URL from a path (must start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends an authenticated request and checks the status.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Path (and query) relative to the base URL
    /// * `body` - Optional JSON body
    ///
    /// # Errors
    /// * `AuthenticationFailed` - no bearer token could be obtained
    /// * `UpstreamError` - non-2xx status, timeout (504) or transport failure (502)
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, GoogleError> {
        let token = self.token_provider.get_token().await?;
        let url = self.url(path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header(http::header::CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(method = %method, url = %url, status = status.as_u16(), "Google API call succeeded");
            return Ok(response);
        }

        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());

        warn!(method = %method, url = %url, status = status.as_u16(), "Google API call failed");
        Err(GoogleError::upstream(status, error_body))
    }

    /// Sends an authenticated request and decodes the JSON response.
    ///
    /// An empty success body decodes to `Value::Null`.
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, GoogleError> {
        let response = self.send(method, path, body).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            GoogleError::upstream(status, format!("Invalid JSON in response: {e}"))
        })
    }
}
