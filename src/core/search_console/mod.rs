//! Google Search Console (webmasters v3) API.
//!
//! Registers site properties, submits sitemaps and reads aggregated search
//! performance.

pub mod client;

pub use client::{SearchAnalyticsQuery, SearchConsole, SearchConsoleClient, default_sitemap_url};
