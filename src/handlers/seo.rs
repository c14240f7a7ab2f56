use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::search_console::SearchConsole;
use crate::core::workflow::{VerificationWorkflow, WorkflowError};
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

pub const VERIFY_SUCCESS_MESSAGE: &str =
    "Verification process initiated successfully. Check Google Search Console for status.";

/// Runs the site verification workflow for the configured site URL
///
/// Returns `{message, verificationFile, steps}` once the fatal steps succeed;
/// the outcome of each tolerated step is reported under `steps`.
pub async fn verify_handler(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let site_url = state.config.site_url().ok_or_else(|| {
        AppError::Configuration("SITE_URL is not set.".to_string())
    })?;

    let verifier = state
        .site_verification()
        .map_err(WorkflowError::Credentials)?;
    let search_console = state
        .search_console()
        .map_err(WorkflowError::Credentials)?;

    let summary = VerificationWorkflow::new(&verifier, &search_console, state.store.as_ref())
        .run(site_url)
        .await?;

    Ok(Json(json!({
        "message": VERIFY_SUCCESS_MESSAGE,
        "verificationFile": summary.verification_file,
        "steps": {
            "persisted": summary.persisted,
            "confirmation": summary.confirmation,
            "domainRegistration": summary.domain_registration,
            "sitemapSubmission": summary.sitemap_submission,
        }
    })))
}

/// Dashboard request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRequest {
    pub site_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl DashboardRequest {
    fn required(&self) -> Option<(&str, &str, &str)> {
        Some((
            non_empty(&self.site_url)?,
            non_empty(&self.start_date)?,
            non_empty(&self.end_date)?,
        ))
    }
}

/// Returns the raw Search Console performance report for a site and date range
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let request: DashboardRequest = serde_json::from_slice(&body).unwrap_or_default();
    let (site_url, start_date, end_date) = request
        .required()
        .ok_or_else(|| AppError::BadRequest("Missing required parameters".to_string()))?;

    let report = state
        .search_console()?
        .get_seo_data(site_url, start_date, end_date)
        .await?;

    info!(site_url = %site_url, start_date = %start_date, end_date = %end_date, "Fetched SEO data");
    Ok(Json(report))
}
