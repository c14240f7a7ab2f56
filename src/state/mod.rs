use std::sync::Arc;

use thiserror::Error;

use crate::config::ServerConfig;
use crate::core::providers::google::{
    GoogleApiClient, GoogleAuthClient, GoogleError, TokenProvider,
};
use crate::core::search_console::SearchConsoleClient;
use crate::core::store::{SqliteVerificationStore, StoreError, VerificationStore};
use crate::core::verification::SiteVerificationClient;

const MISSING_CREDENTIALS_MESSAGE: &str =
    "Google service account is not configured: set GOOGLE_SERVICE_CLIENT_EMAIL and GOOGLE_SERVICE_PRIVATE_KEY";

/// Errors raised while assembling the application state at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to open verification store: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to initialise Google API client: {0}")]
    Google(#[from] GoogleError),
}

/// Application state that can be shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    /// Pooled HTTP client shared by every Google API call
    http_client: reqwest::Client,
    /// Bearer token source, or the reason none is available.
    ///
    /// Missing credentials do not stop the server: sitemap, robots and stored
    /// verification files keep working and only the Google-backed endpoints fail.
    token_provider: Result<Arc<dyn TokenProvider>, GoogleError>,
    /// Durable verification record store
    pub store: Arc<dyn VerificationStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("google_credentials", &self.token_provider.is_ok())
            .finish()
    }
}

impl AppState {
    /// Builds the state from configuration: opens the store named by
    /// `database_url` and initialises the service account token provider.
    pub fn new(config: ServerConfig) -> Result<Arc<Self>, StateError> {
        let store = SqliteVerificationStore::from_url(&config.database_url)?;

        let token_provider = if !config.has_google_credentials() {
            tracing::warn!(
                "Google service account not configured, verification and dashboard endpoints will fail"
            );
            Err(GoogleError::ConfigurationError(
                MISSING_CREDENTIALS_MESSAGE.to_string(),
            ))
        } else {
            match GoogleAuthClient::from_config(&config) {
                Ok(client) => {
                    tracing::info!("Google service account credentials loaded");
                    Ok(Arc::new(client) as Arc<dyn TokenProvider>)
                }
                Err(e) => {
                    tracing::error!("Google service account credentials are unusable: {}", e);
                    Err(e)
                }
            }
        };

        Self::with_components(config, token_provider, Arc::new(store))
    }

    /// Builds the state from explicit collaborators.
    pub fn with_components(
        config: ServerConfig,
        token_provider: Result<Arc<dyn TokenProvider>, GoogleError>,
        store: Arc<dyn VerificationStore>,
    ) -> Result<Arc<Self>, StateError> {
        let http_client = GoogleApiClient::build_http_client(config.google_timeout())?;

        Ok(Arc::new(Self {
            config,
            http_client,
            token_provider,
            store,
        }))
    }

    /// Authenticated Google REST client, or the credential error.
    pub fn google_api(&self) -> Result<GoogleApiClient, GoogleError> {
        let token_provider = self.token_provider.clone()?;
        Ok(GoogleApiClient::new(
            self.http_client.clone(),
            self.config.google_api_base_url.clone(),
            token_provider,
        ))
    }

    pub fn site_verification(&self) -> Result<SiteVerificationClient, GoogleError> {
        self.google_api().map(SiteVerificationClient::new)
    }

    pub fn search_console(&self) -> Result<SearchConsoleClient, GoogleError> {
        self.google_api().map(SearchConsoleClient::new)
    }
}
