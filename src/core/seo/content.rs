//! Generated SEO documents: sitemap, robots directives and the fallback
//! verification page.

use chrono::NaiveDate;

use crate::core::verification::VERIFICATION_CONTENT_PREFIX;

pub const SITEMAP_CHANGEFREQ: &str = "weekly";
pub const SITEMAP_PRIORITY: &str = "0.8";

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders a `urlset` with one entry per static path, all under `base_url`.
pub fn render_sitemap(base_url: &str, paths: &[String], lastmod: NaiveDate) -> String {
    let lastmod = lastmod.format("%Y-%m-%d").to_string();
    let base_url = base_url.trim_end_matches('/');

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for path in paths {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&format!("{base_url}{path}"))
        ));
        xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
        xml.push_str(&format!("    <changefreq>{SITEMAP_CHANGEFREQ}</changefreq>\n"));
        xml.push_str(&format!("    <priority>{SITEMAP_PRIORITY}</priority>\n"));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>");
    xml
}

/// Renders robots directives that allow everything and point at the sitemap.
pub fn render_robots(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

/// Page served for unknown verification files when the fallback is enabled.
pub fn render_fallback_verification(file_name: &str) -> String {
    format!(
        "<html><head><title></title></head><body>{VERIFICATION_CONTENT_PREFIX}{}</body></html>",
        escape_xml(file_name)
    )
}
