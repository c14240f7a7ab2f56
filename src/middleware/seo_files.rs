use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::core::seo::{
    SeoPath, render_fallback_verification, render_robots, render_sitemap, resolve_base_url,
};
use crate::errors::app_error::AppError;
use crate::state::AppState;

/// Serves well-known SEO files ahead of the router
///
/// The middleware:
/// 1. Passes every request that is not `GET`/`HEAD` straight through
/// 2. Classifies the path with [`SeoPath::classify`]
/// 3. Generates `/sitemap.xml` and `/robots.txt` from the request's base URL
/// 4. Serves `/google<token>.html` from the latest stored verification record
/// 5. Hands any other path to the next layer
///
/// # Arguments
/// * `state` - Application state holding the configuration and verification store
/// * `request` - The incoming HTTP request
/// * `next` - The next middleware or handler in the chain
pub async fn seo_files_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    match SeoPath::classify(request.uri().path()) {
        SeoPath::Other => next.run(request).await,
        SeoPath::Sitemap => {
            let base_url = request_base_url(&state, &request);
            let xml = render_sitemap(
                &base_url,
                &state.config.sitemap_paths,
                chrono::Utc::now().date_naive(),
            );
            tracing::debug!(base_url = %base_url, "Serving sitemap");
            ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
        }
        SeoPath::Robots => {
            let base_url = request_base_url(&state, &request);
            tracing::debug!(base_url = %base_url, "Serving robots.txt");
            ([(header::CONTENT_TYPE, "text/plain")], render_robots(&base_url)).into_response()
        }
        SeoPath::VerificationFile { file_name, token } => {
            serve_verification_file(&state, &file_name, &token).await
        }
    }
}

async fn serve_verification_file(state: &AppState, file_name: &str, token: &str) -> Response {
    match state.store.find_latest_by_token(token).await {
        Ok(Some(record)) => {
            tracing::info!(token = %token, domain = %record.domain, "Serving verification file");
            ([(header::CONTENT_TYPE, "text/html")], record.content).into_response()
        }
        Ok(None) if state.config.verification_fallback => {
            tracing::info!(token = %token, "Serving fallback verification file");
            (
                [(header::CONTENT_TYPE, "text/html")],
                render_fallback_verification(file_name),
            )
                .into_response()
        }
        Ok(None) => {
            AppError::NotFound(format!("Verification file {file_name} not found")).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

fn request_base_url(state: &AppState, request: &Request) -> String {
    let host = host_header(request.headers())
        .or_else(|| request.uri().authority().map(|a| a.as_str()));
    resolve_base_url(host, state.config.site_url(), state.config.port)
}

fn host_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::HOST).and_then(|v| v.to_str().ok())
}
