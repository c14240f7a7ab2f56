//! Well-known SEO files: path classification and generated content.
//!
//! - `path`: maps request paths to [`SeoPath`] and extracts verification tokens
//! - `content`: sitemap, robots and fallback verification page rendering
//! - `base_url`: the public base URL shared by sitemap and robots

pub mod base_url;
pub mod content;
pub mod path;

pub use base_url::resolve_base_url;
pub use content::{render_fallback_verification, render_robots, render_sitemap};
pub use path::{ROBOTS_PATH, SITEMAP_PATH, SeoPath, token_from_file_name};

/// Static site paths listed in the sitemap when none are configured.
pub const DEFAULT_SITEMAP_PATHS: &[&str] = &["", "/about", "/services", "/contact"];
