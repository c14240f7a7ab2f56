//! End-to-end site verification workflow.
//!
//! `Start → TokenRequested → Persisted → ConfirmAttempted →
//! DomainRegistrationAttempted → SitemapSubmitAttempted → Done`
//!
//! The first two steps are fatal on failure. The last three call systems that
//! may settle after this request returns; their failures are logged and
//! recorded as [`StepOutcome::Failed`] in the summary instead of aborting.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::core::providers::google::GoogleError;
use crate::core::search_console::SearchConsole;
use crate::core::seo::token_from_file_name;
use crate::core::store::{InsertOutcome, NewVerificationRecord, StoreError, VerificationStore};
use crate::core::verification::SiteVerifier;

/// Fatal workflow failures.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Google credentials unavailable: {0}")]
    Credentials(#[source] GoogleError),

    #[error("Failed to request verification token: {0}")]
    TokenRequest(#[source] GoogleError),

    #[error("Failed to persist verification record: {0}")]
    Persist(#[from] StoreError),

    #[error("Invalid site URL '{0}'")]
    InvalidSiteUrl(String),

    #[error("Unexpected verification file name '{0}'")]
    InvalidFileName(String),
}

/// Result of a step whose failure does not abort the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Ok,
    Failed { reason: String },
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    fn from_result<T>(step: &'static str, result: Result<T, GoogleError>) -> Self {
        match result {
            Ok(_) => {
                info!(step, "Workflow step succeeded");
                Self::Ok
            }
            Err(e) => {
                warn!(step, error = %e, "Workflow step failed; continuing");
                Self::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// What a completed workflow run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSummary {
    /// File name issued by Google, e.g. `googleABC123.html`.
    pub verification_file: String,
    pub domain: String,
    pub token: String,
    pub persisted: InsertOutcome,
    pub confirmation: StepOutcome,
    pub domain_registration: StepOutcome,
    pub sitemap_submission: StepOutcome,
}

/// Hostname of an absolute http(s) site URL.
pub fn domain_from_site_url(site_url: &str) -> Result<String, WorkflowError> {
    let parsed =
        Url::parse(site_url).map_err(|_| WorkflowError::InvalidSiteUrl(site_url.to_string()))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(WorkflowError::InvalidSiteUrl(site_url.to_string())),
    }
}

/// Drives one verification attempt for a site.
pub struct VerificationWorkflow<'a> {
    verifier: &'a dyn SiteVerifier,
    search_console: &'a dyn SearchConsole,
    store: &'a dyn VerificationStore,
}

impl<'a> VerificationWorkflow<'a> {
    pub fn new(
        verifier: &'a dyn SiteVerifier,
        search_console: &'a dyn SearchConsole,
        store: &'a dyn VerificationStore,
    ) -> Self {
        Self {
            verifier,
            search_console,
            store,
        }
    }

    pub async fn run(&self, site_url: &str) -> Result<VerificationSummary, WorkflowError> {
        let domain = domain_from_site_url(site_url)?;
        info!(site_url = %site_url, domain = %domain, "Starting site verification");

        let issued = self
            .verifier
            .request_verification_token(site_url)
            .await
            .map_err(|e| {
                error!(site_url = %site_url, error = %e, "Verification token request failed");
                WorkflowError::TokenRequest(e)
            })?;
        info!(file_name = %issued.file_name, "Verification token issued");

        let token = token_from_file_name(&issued.file_name)
            .ok_or_else(|| WorkflowError::InvalidFileName(issued.file_name.clone()))?;

        let persisted = self
            .store
            .insert(NewVerificationRecord::new(
                domain.clone(),
                token.clone(),
                issued.file_content.clone(),
            ))
            .await
            .map_err(|e| {
                error!(token = %token, error = %e, "Failed to persist verification record");
                WorkflowError::Persist(e)
            })?;
        info!(token = %token, outcome = ?persisted, "Verification record persisted");

        let confirmation = StepOutcome::from_result(
            "confirm_verification",
            self.verifier.confirm_verification(site_url).await,
        );
        let domain_registration = StepOutcome::from_result(
            "register_domain",
            self.search_console.register_domain(site_url).await,
        );
        let sitemap_submission = StepOutcome::from_result(
            "submit_sitemap",
            self.search_console.submit_sitemap(site_url, None).await,
        );

        info!(file_name = %issued.file_name, "Site verification workflow completed");

        Ok(VerificationSummary {
            verification_file: issued.file_name,
            domain,
            token,
            persisted,
            confirmation,
            domain_registration,
            sitemap_submission,
        })
    }
}
