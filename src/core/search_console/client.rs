use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::providers::google::{GoogleApiClient, GoogleError, encode_path_segment};

/// Body of a `searchAnalytics/query` request.
///
/// Only the `query` dimension is requested, over web search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsQuery {
    pub start_date: String,
    pub end_date: String,
    pub dimensions: Vec<String>,
    pub search_type: String,
}

impl SearchAnalyticsQuery {
    /// Query-text performance between two inclusive `YYYY-MM-DD` dates.
    pub fn by_query(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            dimensions: vec!["query".to_string()],
            search_type: "web".to_string(),
        }
    }
}

/// Default sitemap feed URL for a site: `<site>/sitemap.xml`.
pub fn default_sitemap_url(site_url: &str) -> String {
    format!("{}/sitemap.xml", site_url.trim_end_matches('/'))
}

/// Operations of the Search Console API used by this service.
#[async_trait]
pub trait SearchConsole: Send + Sync {
    /// Adds `site_url` as a property. Re-adding an existing property succeeds upstream.
    async fn register_domain(&self, site_url: &str) -> Result<(), GoogleError>;

    /// Submits a sitemap feed; `sitemap_path` defaults to `<site_url>/sitemap.xml`.
    async fn submit_sitemap(
        &self,
        site_url: &str,
        sitemap_path: Option<&str>,
    ) -> Result<(), GoogleError>;

    /// Aggregated search performance per query between two inclusive dates.
    ///
    /// The upstream report is returned as-is.
    async fn get_seo_data(
        &self,
        site_url: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<serde_json::Value, GoogleError>;
}

/// Search Console (webmasters v3) API client.
#[derive(Debug, Clone)]
pub struct SearchConsoleClient {
    api: GoogleApiClient,
}

impl SearchConsoleClient {
    pub fn new(api: GoogleApiClient) -> Self {
        Self { api }
    }

    fn site_path(site_url: &str) -> String {
        format!("/webmasters/v3/sites/{}", encode_path_segment(site_url))
    }
}

#[async_trait]
impl SearchConsole for SearchConsoleClient {
    async fn register_domain(&self, site_url: &str) -> Result<(), GoogleError> {
        self.api
            .send(Method::PUT, &Self::site_path(site_url), None)
            .await?;

        info!(site_url = %site_url, "Domain registered in Search Console");
        Ok(())
    }

    async fn submit_sitemap(
        &self,
        site_url: &str,
        sitemap_path: Option<&str>,
    ) -> Result<(), GoogleError> {
        let feed_url = sitemap_path
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_sitemap_url(site_url));

        let path = format!(
            "{}/sitemaps/{}",
            Self::site_path(site_url),
            encode_path_segment(&feed_url)
        );
        self.api.send(Method::PUT, &path, None).await?;

        info!(site_url = %site_url, feed_url = %feed_url, "Sitemap submitted");
        Ok(())
    }

    async fn get_seo_data(
        &self,
        site_url: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<serde_json::Value, GoogleError> {
        let query = SearchAnalyticsQuery::by_query(start_date, end_date);
        let body = serde_json::to_value(&query).map_err(|e| {
            GoogleError::ConfigurationError(format!("Failed to encode search analytics query: {e}"))
        })?;

        let path = format!("{}/searchAnalytics/query", Self::site_path(site_url));
        self.api.send_json(Method::POST, &path, Some(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::providers::google::MockTokenProvider;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    fn client_for(server: &MockServer) -> SearchConsoleClient {
        let http = GoogleApiClient::build_http_client(Duration::from_secs(2)).unwrap();
        SearchConsoleClient::new(GoogleApiClient::new(
            http,
            server.uri(),
            Arc::new(MockTokenProvider::with_token("test-token")),
        ))
    }

    #[test]
    fn test_default_sitemap_url() {
        assert_eq!(
            default_sitemap_url("https://example.com"),
            "https://example.com/sitemap.xml"
        );
        assert_eq!(
            default_sitemap_url("https://example.com/"),
            "https://example.com/sitemap.xml"
        );
    }

    #[test]
    fn test_search_analytics_query_shape() {
        let query = SearchAnalyticsQuery::by_query("2024-01-01", "2024-01-31");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "startDate": "2024-01-01",
                "endDate": "2024-01-31",
                "dimensions": ["query"],
                "searchType": "web",
            })
        );
    }

    #[tokio::test]
    async fn test_register_domain() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/webmasters/v3/sites/https%3A%2F%2Fexample.com"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .register_domain("https://example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_domain_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .register_domain("https://example.com")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_submit_sitemap_default_feed() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(
                "/webmasters/v3/sites/https%3A%2F%2Fexample.com/sitemaps/https%3A%2F%2Fexample.com%2Fsitemap.xml",
            ))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .submit_sitemap("https://example.com", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_submit_sitemap_explicit_feed() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(
                "/webmasters/v3/sites/https%3A%2F%2Fexample.com/sitemaps/https%3A%2F%2Fexample.com%2Fnews.xml",
            ))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .submit_sitemap("https://example.com", Some("https://example.com/news.xml"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_seo_data_passthrough() {
        let server = MockServer::start().await;
        let report = json!({
            "rows": [
                {"keys": ["shoes"], "clicks": 10, "impressions": 100, "ctr": 0.1, "position": 5.2}
            ],
            "responseAggregationType": "byProperty"
        });

        Mock::given(method("POST"))
            .and(path(
                "/webmasters/v3/sites/https%3A%2F%2Fexample.com/searchAnalytics/query",
            ))
            .and(body_json(json!({
                "startDate": "2024-01-01",
                "endDate": "2024-01-31",
                "dimensions": ["query"],
                "searchType": "web",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(report.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server)
            .get_seo_data("https://example.com", "2024-01-01", "2024-01-31")
            .await
            .unwrap();
        assert_eq!(value, report);
    }
}
