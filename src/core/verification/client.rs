use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::core::providers::google::{GoogleApiClient, GoogleError};

const TOKEN_PATH: &str = "/siteVerification/v1/token";
const WEB_RESOURCE_PATH: &str = "/siteVerification/v1/webResource?verificationMethod=FILE";

/// Prefix Google expects in the body of an HTML verification file.
pub const VERIFICATION_CONTENT_PREFIX: &str = "google-site-verification: ";

/// A verification file issued by Google.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationToken {
    /// File name Google will fetch from the site root, e.g. `google5f84cf98cef09ae3.html`.
    pub file_name: String,
    /// Exact content the file must serve.
    pub file_content: String,
}

impl VerificationToken {
    /// Builds a token for a FILE verification method from the issued file name.
    pub fn for_file(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let file_content = format!("{VERIFICATION_CONTENT_PREFIX}{file_name}");
        Self {
            file_name,
            file_content,
        }
    }
}

/// `getToken` response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    method: Option<String>,
    token: String,
}

/// Operations of the Site Verification API used by the verification workflow.
#[async_trait]
pub trait SiteVerifier: Send + Sync {
    /// Asks Google for a FILE verification token for `site_url`.
    async fn request_verification_token(
        &self,
        site_url: &str,
    ) -> Result<VerificationToken, GoogleError>;

    /// Asks Google to fetch the verification file from the live site and confirm ownership.
    async fn confirm_verification(&self, site_url: &str) -> Result<bool, GoogleError>;
}

/// Site Verification API client.
#[derive(Debug, Clone)]
pub struct SiteVerificationClient {
    api: GoogleApiClient,
}

impl SiteVerificationClient {
    pub fn new(api: GoogleApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SiteVerifier for SiteVerificationClient {
    async fn request_verification_token(
        &self,
        site_url: &str,
    ) -> Result<VerificationToken, GoogleError> {
        let body = json!({
            "site": { "type": "SITE", "identifier": site_url },
            "verificationMethod": "FILE",
        });

        let value = self
            .api
            .send_json(Method::POST, TOKEN_PATH, Some(&body))
            .await?;

        let response: TokenResponse = serde_json::from_value(value).map_err(|e| {
            GoogleError::UpstreamError {
                status: 502,
                body: format!("Unexpected verification token response: {e}"),
            }
        })?;

        if response.token.trim().is_empty() {
            return Err(GoogleError::UpstreamError {
                status: 502,
                body: "Verification token response contained an empty token".to_string(),
            });
        }

        info!(
            site_url = %site_url,
            method = response.method.as_deref().unwrap_or("FILE"),
            file_name = %response.token,
            "Verification token issued"
        );

        Ok(VerificationToken::for_file(response.token))
    }

    async fn confirm_verification(&self, site_url: &str) -> Result<bool, GoogleError> {
        let body = json!({
            "site": { "type": "SITE", "identifier": site_url },
        });

        self.api
            .send(Method::POST, WEB_RESOURCE_PATH, Some(&body))
            .await?;

        info!(site_url = %site_url, "Site verification confirmed");
        Ok(true)
    }
}
