//! Provider infrastructure for external cloud services.
//!
//! # Available Providers
//!
//! - **google**: Google service account authentication and REST client infrastructure

pub mod google;

// Re-export Google types for convenience
pub use google::{
    DEFAULT_SCOPES, GOOGLE_API_BASE_URL, GoogleApiClient, GoogleAuthClient, GoogleError,
    SITE_VERIFICATION_SCOPE, StaticTokenProvider, TokenProvider, WEBMASTERS_SCOPE,
};
