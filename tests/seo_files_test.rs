use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use regex::Regex;
use tower::util::ServiceExt;

use sitebeacon::core::providers::google::StaticTokenProvider;
use sitebeacon::core::store::{
    NewVerificationRecord, SqliteVerificationStore, VerificationStore,
};
use sitebeacon::{ServerConfig, routes, state::AppState};

fn app_with(config: ServerConfig, store: Arc<SqliteVerificationStore>) -> Router {
    let state = AppState::with_components(
        config,
        Ok(Arc::new(StaticTokenProvider::new("unused"))),
        store,
    )
    .unwrap();
    routes::create_app(state)
}

fn default_app() -> Router {
    app_with(
        ServerConfig::default(),
        Arc::new(SqliteVerificationStore::in_memory().unwrap()),
    )
}

async fn get(app: Router, uri: &str, host: Option<&str>) -> (StatusCode, Option<String>, String) {
    let mut builder = Request::builder().uri(uri);
    if let Some(host) = host {
        builder = builder.header(header::HOST, host);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_sitemap_lists_configured_paths() {
    let (status, content_type, body) = get(default_app(), "/sitemap.xml", Some("example.com")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/xml"));

    let locs: Vec<String> = Regex::new(r"<loc>([^<]*)</loc>")
        .unwrap()
        .captures_iter(&body)
        .map(|c| c[1].to_string())
        .collect();
    assert_eq!(
        locs,
        vec![
            "https://example.com",
            "https://example.com/about",
            "https://example.com/services",
            "https://example.com/contact",
        ]
    );

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let lastmods = Regex::new(r"<lastmod>(\d{4}-\d{2}-\d{2})</lastmod>")
        .unwrap()
        .captures_iter(&body)
        .map(|c| c[1].to_string())
        .collect::<Vec<_>>();
    assert_eq!(lastmods.len(), 4);
    for lastmod in lastmods {
        assert!(chrono::NaiveDate::parse_from_str(&lastmod, "%Y-%m-%d").is_ok());
        // The date may roll over between rendering and this check.
        assert!(lastmod <= today);
    }
}

#[tokio::test]
async fn test_sitemap_uses_custom_paths() {
    let config = ServerConfig {
        sitemap_paths: vec!["/pricing".to_string()],
        ..ServerConfig::default()
    };
    let app = app_with(config, Arc::new(SqliteVerificationStore::in_memory().unwrap()));

    let (_, _, body) = get(app, "/sitemap.xml", Some("example.com")).await;

    assert_eq!(body.matches("<url>").count(), 1);
    assert!(body.contains("<loc>https://example.com/pricing</loc>"));
}

#[tokio::test]
async fn test_robots_references_same_base_url_as_sitemap() {
    for host in ["example.com", "localhost:3001", "127.0.0.1:8080"] {
        let (_, _, sitemap) = get(default_app(), "/sitemap.xml", Some(host)).await;
        let (status, content_type, robots) = get(default_app(), "/robots.txt", Some(host)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/plain"));

        let first_loc = Regex::new(r"<loc>([^<]*)</loc>")
            .unwrap()
            .captures(&sitemap)
            .map(|c| c[1].to_string())
            .unwrap();
        assert_eq!(
            robots,
            format!("User-agent: *\nAllow: /\n\nSitemap: {first_loc}/sitemap.xml\n")
        );
    }
}

#[tokio::test]
async fn test_localhost_uses_http() {
    let (_, _, robots) = get(default_app(), "/robots.txt", Some("localhost:3001")).await;
    assert!(robots.ends_with("Sitemap: http://localhost:3001/sitemap.xml\n"));
}

#[tokio::test]
async fn test_base_url_without_host_header() {
    let config = ServerConfig {
        site_url: Some("https://configured.example.com/".to_string()),
        ..ServerConfig::default()
    };
    let app = app_with(config, Arc::new(SqliteVerificationStore::in_memory().unwrap()));
    let (_, _, robots) = get(app, "/robots.txt", None).await;
    assert!(robots.ends_with("Sitemap: https://configured.example.com/sitemap.xml\n"));

    let config = ServerConfig {
        port: 9003,
        ..ServerConfig::default()
    };
    let app = app_with(config, Arc::new(SqliteVerificationStore::in_memory().unwrap()));
    let (_, _, robots) = get(app, "/robots.txt", None).await;
    assert!(robots.ends_with("Sitemap: http://localhost:9003/sitemap.xml\n"));
}

#[tokio::test]
async fn test_query_string_is_ignored() {
    let (status, content_type, _) =
        get(default_app(), "/sitemap.xml?utm_source=x", Some("example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/xml"));
}

#[tokio::test]
async fn test_only_get_and_head_are_intercepted() {
    let response = default_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/robots.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = default_app()
        .oneshot(
            Request::builder()
                .method("HEAD")
                .uri("/robots.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_known_verification_file_served_byte_for_byte() {
    let store = Arc::new(SqliteVerificationStore::in_memory().unwrap());
    let content = "google-site-verification: googleABC123.html";
    store
        .insert(NewVerificationRecord::new("example.com", "ABC123", content))
        .await
        .unwrap();

    let (status, content_type, body) =
        get(app_with(ServerConfig::default(), store), "/googleABC123.html", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html"));
    assert_eq!(body, content);
}

#[tokio::test]
async fn test_latest_record_wins() {
    let store = Arc::new(SqliteVerificationStore::in_memory().unwrap());
    store
        .insert(NewVerificationRecord::new("old.example.com", "ABC123", "old content"))
        .await
        .unwrap();
    store
        .insert(NewVerificationRecord::new("new.example.com", "ABC123", "new content"))
        .await
        .unwrap();

    let (status, _, body) =
        get(app_with(ServerConfig::default(), store), "/googleABC123.html", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "new content");
}

#[tokio::test]
async fn test_unknown_verification_file_is_not_found() {
    let (status, _, body) = get(default_app(), "/googleUNKNOWN.html", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("googleUNKNOWN.html"));
}

#[tokio::test]
async fn test_unknown_verification_file_with_fallback() {
    let config = ServerConfig {
        verification_fallback: true,
        ..ServerConfig::default()
    };
    let app = app_with(config, Arc::new(SqliteVerificationStore::in_memory().unwrap()));

    let (status, content_type, body) = get(app, "/googleUNKNOWN.html", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html"));
    assert_eq!(
        body,
        "<html><head><title></title></head><body>google-site-verification: googleUNKNOWN.html</body></html>"
    );
}
