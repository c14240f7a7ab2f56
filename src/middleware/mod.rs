//! Request middleware
//!
//! - `seo_files` - sitemap, robots and verification files served ahead of routing

pub mod seo_files;

pub use seo_files::seo_files_middleware;
