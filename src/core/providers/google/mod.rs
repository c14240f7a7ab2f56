//! Google API provider infrastructure.
//!
//! Shared authentication and REST plumbing for the Google Site Verification
//! and Search Console APIs.
//!
//! # Architecture
//!
//! - **auth**: service account identity and bearer token acquisition
//! - **client**: authenticated REST client with timeout and status mapping
//! - **error**: common error types for Google API operations
//!
//! # Common Scopes
//!
//! - **Search Console**: `https://www.googleapis.com/auth/webmasters`
//! - **Site Verification**: `https://www.googleapis.com/auth/siteverification`

pub mod auth;
pub mod client;
pub mod error;

// Re-export commonly used types
pub use auth::{GoogleAuthClient, ServiceAccountIdentity, StaticTokenProvider, TokenProvider};
pub use client::{DEFAULT_TIMEOUT, GOOGLE_API_BASE_URL, GoogleApiClient, encode_path_segment};
pub use error::GoogleError;

#[cfg(test)]
pub use auth::MockTokenProvider;

/// OAuth2 scope for the Search Console (webmasters) API.
pub const WEBMASTERS_SCOPE: &str = "https://www.googleapis.com/auth/webmasters";

/// OAuth2 scope for the Site Verification API.
pub const SITE_VERIFICATION_SCOPE: &str = "https://www.googleapis.com/auth/siteverification";

/// Scopes requested when none are configured.
pub const DEFAULT_SCOPES: &[&str] = &[WEBMASTERS_SCOPE, SITE_VERIFICATION_SCOPE];
