use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::core::providers::google::GoogleError;
use crate::core::store::StoreError;
use crate::core::workflow::WorkflowError;

/// Application error type
///
/// Every variant renders as a JSON body with an `error` field; failures that
/// carry an underlying cause add it as `details`.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// Required configuration is missing or unusable.
    Configuration(String),
    /// An external API call failed.
    Upstream {
        error: String,
        details: Option<String>,
    },
    Internal {
        error: String,
        details: Option<String>,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) | AppError::Upstream { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                json!({ "error": msg })
            }
            AppError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                json!({ "error": msg })
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                json!({ "error": msg })
            }
            AppError::Upstream { error, details } | AppError::Internal { error, details } => {
                tracing::error!(details = ?details, "{}", error);
                match details {
                    Some(details) => json!({ "error": error, "details": details }),
                    None => json!({ "error": error }),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            AppError::Upstream { error, details } | AppError::Internal { error, details } => {
                match details {
                    Some(details) => write!(f, "{error}: {details}"),
                    None => write!(f, "{error}"),
                }
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<GoogleError> for AppError {
    fn from(err: GoogleError) -> Self {
        match err {
            GoogleError::ConfigurationError(msg) => AppError::Configuration(msg),
            other => AppError::Upstream {
                error: other.to_string(),
                details: None,
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal {
            error: "Verification store error".to_string(),
            details: Some(err.to_string()),
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        AppError::Internal {
            error: "Verification process failed.".to_string(),
            details: Some(err.to_string()),
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let err = AppError::BadRequest("Missing required parameters".into());
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing required parameters"}));
    }

    #[tokio::test]
    async fn test_workflow_error_has_details() {
        let err = AppError::from(WorkflowError::InvalidFileName("x.txt".into()));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Verification process failed.");
        assert!(body["details"].as_str().unwrap().contains("x.txt"));
    }

    #[tokio::test]
    async fn test_google_configuration_error_maps_to_configuration() {
        let err = AppError::from(GoogleError::ConfigurationError("missing key".into()));
        assert!(matches!(err, AppError::Configuration(_)));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "missing key"}));
    }

    #[tokio::test]
    async fn test_upstream_error_without_details() {
        let err = AppError::from(GoogleError::UpstreamError {
            status: 403,
            body: "forbidden".into(),
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("403"));
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AppError::NotFound("googleX.html".into()).to_string(),
            "Not found: googleX.html"
        );
    }
}
