//! Google API error types.
//!
//! Shared by the Site Verification and Search Console clients and by the
//! credential provider that feeds them bearer tokens.

use reqwest::StatusCode;

/// Maximum number of characters of an upstream error body kept in errors.
pub const MAX_ERROR_BODY_LEN: usize = 500;

/// Error types for Google API operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GoogleError {
    /// Configuration error (missing service account identity, bad scopes, etc.)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Credential exchange did not yield a bearer token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Non-success response (or transport failure) from a Google endpoint
    #[error("Upstream error ({status}): {body}")]
    UpstreamError { status: u16, body: String },
}

impl GoogleError {
    /// Builds an upstream error from a response status and body, capping the body.
    pub fn upstream(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        let body = if body.len() > MAX_ERROR_BODY_LEN {
            let mut end = MAX_ERROR_BODY_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated)", &body[..end])
        } else {
            body
        };

        Self::UpstreamError {
            status: status.as_u16(),
            body,
        }
    }

    /// Returns the upstream HTTP status, if this is an upstream error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GoogleError {
    /// Transport failures are surfaced as upstream errors: timeouts as 504,
    /// everything else (DNS, refused connection, bad body) as 502.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::upstream(StatusCode::GATEWAY_TIMEOUT, format!("request timed out: {err}"))
        } else if let Some(status) = err.status() {
            Self::upstream(status, err.to_string())
        } else {
            Self::upstream(StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}
