//! HTTP request handlers
//!
//! - `api` - Health check and fallback endpoints
//! - `seo` - Site verification workflow and Search Console dashboard

pub mod api;
pub mod seo;
